//! Split classification: attributes each split to zero or one phage region
//! and applies the reporting filters.

use std::collections::HashMap;
use std::fmt;

use crate::global_signal::{Fragment, Prediction};
use crate::splits::SplitRecord;

/// Whether an annotation comes from a whole-contig phage or an integrated
/// prophage sub-region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhageKind {
    Phage,
    Prophage,
}

impl fmt::Display for PhageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phage => write!(f, "phage"),
            Self::Prophage => write!(f, "prophage"),
        }
    }
}

/// A fully populated per-split annotation. Never constructed partially; a
/// split either gets all of these fields or is [`SplitCall::Unclassified`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAnnotation {
    pub label: String,
    pub category: u8,
    pub kind: PhageKind,
    pub phage_length: i64,
    pub num_genes: u32,
    pub num_hallmarks: u32,
}

impl SplitAnnotation {
    /// The reported category tag, e.g. `cat2_prophage`.
    #[must_use]
    pub fn category_tag(&self) -> String {
        format!("cat{}_{}", self.category, self.kind)
    }
}

/// Classification outcome for one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitCall {
    Annotated(SplitAnnotation),
    /// No prediction applies: the parent has none, or the split misses the
    /// prophage region. Reported with empty/zero fields.
    Unclassified,
}

impl SplitCall {
    #[must_use]
    pub fn phage_length(&self) -> i64 {
        match self {
            Self::Annotated(a) => a.phage_length,
            Self::Unclassified => 0,
        }
    }
}

/// Decides the annotation for a single split.
///
/// Whole-contig phages annotate every split of the contig and report the
/// contig's total split length. Prophages annotate only the splits whose
/// start or stop falls inside the region (closed interval) and report the
/// region's base-pair extent.
#[must_use]
pub fn classify(
    split: &SplitRecord,
    predictions: &HashMap<String, Prediction>,
    parent_lengths: &HashMap<String, i64>,
) -> SplitCall {
    let Some(prediction) = predictions.get(&split.parent) else {
        return SplitCall::Unclassified;
    };

    let (kind, phage_length) = match &prediction.fragment {
        Fragment::WholeContig => {
            let total = parent_lengths.get(&split.parent).copied().unwrap_or(0);
            (PhageKind::Phage, total)
        }
        Fragment::Prophage {
            start_bp, stop_bp, ..
        } => {
            let region = *start_bp..=*stop_bp;
            // Endpoint containment only, deliberately not a symmetric
            // interval intersection: a split that strictly contains the
            // region has neither endpoint inside it and stays unmatched.
            let overlaps = region.contains(&split.start) || region.contains(&split.stop);
            if !overlaps {
                return SplitCall::Unclassified;
            }
            (PhageKind::Prophage, stop_bp - start_bp)
        }
    };

    SplitCall::Annotated(SplitAnnotation {
        label: prediction.label.clone(),
        category: prediction.category,
        kind,
        phage_length,
        num_genes: prediction.num_fragment_genes,
        num_hallmarks: prediction.num_hallmark_genes,
    })
}

/// Reporting filters applied to every classified split.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// Minimum phage length to report, in base pairs.
    pub min_phage_length: i64,
    /// Drop all category 3 predictions.
    pub exclude_cat3: bool,
    /// Drop all prophage predictions.
    pub exclude_prophages: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            min_phage_length: 1000,
            exclude_cat3: false,
            exclude_prophages: false,
        }
    }
}

/// Applies the output filter table to a classification outcome.
///
/// The branch structure is asymmetric on purpose: `exclude_cat3` admits only
/// the four explicit cat1/cat2 tags (so unclassified rows always fail it),
/// while without it unclassified rows pass everything except the minimum
/// length, which they fail at any positive threshold.
#[must_use]
pub fn passes_filters(call: &SplitCall, opts: &FilterOptions) -> bool {
    if call.phage_length() < opts.min_phage_length {
        return false;
    }

    let annotation = match call {
        SplitCall::Annotated(a) => a,
        SplitCall::Unclassified => {
            return !opts.exclude_cat3 && !opts.exclude_prophages;
        }
    };

    if opts.exclude_cat3 {
        if !matches!(annotation.category, 1 | 2) {
            return false;
        }
        if opts.exclude_prophages {
            return annotation.kind == PhageKind::Phage;
        }
        true
    } else if opts.exclude_prophages {
        matches!(annotation.category, 1..=3) && annotation.kind == PhageKind::Phage
    } else {
        true
    }
}
