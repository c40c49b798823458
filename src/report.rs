//! The final pass: one classification decision per split feeding both
//! output streams.

use std::collections::HashMap;
use std::io::Write;

use crate::classify::{FilterOptions, SplitCall, classify, passes_filters};
use crate::error::Error;
use crate::global_signal::Prediction;
use crate::splits::SplitRecord;

/// Header of the additional-info stream, importable by Anvi'o as an
/// additional data file for splits.
pub const ANNOTATION_HEADER: &str =
    "split\tphage_name\tphage_category\tphage_length\tnum_genes_in_phage\tnum_phage_hallmark_genes_in_phage";

/// Tallies of the classification pass, for console reporting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportCounts {
    /// Splits written to both output streams.
    pub emitted: usize,
    /// Splits with an annotation that failed the reporting filters.
    pub filtered: usize,
    /// Splits with no applicable prediction.
    pub unclassified: usize,
}

/// Classifies every split once and writes the passing ones to the
/// additional-info stream (with header) and the collection stream (two
/// columns, no header).
///
/// Output order follows the splits table; a passing split appears exactly
/// once in each stream.
pub fn write_reports<W1: Write, W2: Write>(
    splits: &[SplitRecord],
    predictions: &HashMap<String, Prediction>,
    parent_lengths: &HashMap<String, i64>,
    opts: &FilterOptions,
    annotation_out: &mut W1,
    collection_out: &mut W2,
) -> Result<ReportCounts, Error> {
    writeln!(annotation_out, "{ANNOTATION_HEADER}")?;

    let mut counts = ReportCounts::default();
    for split in splits {
        let call = classify(split, predictions, parent_lengths);
        if matches!(call, SplitCall::Unclassified) {
            counts.unclassified += 1;
        }
        if !passes_filters(&call, opts) {
            if matches!(call, SplitCall::Annotated(_)) {
                counts.filtered += 1;
            }
            continue;
        }

        match &call {
            SplitCall::Annotated(a) => {
                writeln!(
                    annotation_out,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    split.name,
                    a.label,
                    a.category_tag(),
                    a.phage_length,
                    a.num_genes,
                    a.num_hallmarks
                )?;
                writeln!(collection_out, "{}\t{}", split.name, a.label)?;
            }
            // Unclassified rows reach the outputs only when the minimum
            // length is zero and no exclusion flag is set; they carry empty
            // names and zero counts.
            SplitCall::Unclassified => {
                writeln!(annotation_out, "{}\t\t\t0\t0\t0", split.name)?;
                writeln!(collection_out, "{}\t", split.name)?;
            }
        }
        counts.emitted += 1;
    }

    Ok(counts)
}
