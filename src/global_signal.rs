//! Parser for the VIRSorter_global_signal.csv prediction table.
//!
//! This is VirSorter's final per-contig verdict. Each data line predicts
//! either a whole contig as a phage, or a sub-range of it (expressed in gene
//! ordinals) as an integrated prophage. Merging resolves the gene-ordinal
//! boundaries of prophage fragments to base-pair coordinates through the
//! [`GeneIndex`], so downstream split attribution can work purely in base
//! pairs.

use std::collections::HashMap;
use std::io::BufRead;

use crate::affi::GeneIndex;
use crate::error::Error;
use crate::naming::{fragment_gene_range, is_circular, normalize_contig_name};

/// The extent of a phage prediction within its contig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// The whole contig is the predicted phage.
    WholeContig,
    /// A prophage sub-region bounded by two genes, resolved to base pairs.
    Prophage {
        start_gene: String,
        stop_gene: String,
        start_bp: i64,
        stop_bp: i64,
    },
}

/// One merged per-contig prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub contig: String,
    pub num_genes_in_contig: u32,
    pub fragment_id: String,
    pub num_fragment_genes: u32,
    pub num_hallmark_genes: u32,
    pub is_circular: bool,
    /// VirSorter confidence tier, 1 (sure) to 3 (possible).
    pub category: u8,
    /// `phage_<m>` or `prophage_<n>`, numbered in row-encounter order by two
    /// independent counters.
    pub label: String,
    pub fragment: Fragment,
}

impl Prediction {
    #[must_use]
    pub fn is_whole_contig(&self) -> bool {
        matches!(self.fragment, Fragment::WholeContig)
    }
}

/// Parses the global-signal table and merges it with the gene index into one
/// record per contig, keyed by normalized contig name.
///
/// When VirSorter emits several rows for the same contig the last row wins,
/// matching how the table is consumed upstream.
pub fn merge_predictions<R: BufRead>(
    reader: R,
    genes: &GeneIndex,
) -> Result<HashMap<String, Prediction>, Error> {
    let mut predictions: HashMap<String, Prediction> = HashMap::new();
    let mut next_phage = 1u32;
    let mut next_prophage = 1u32;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 6 {
            return Err(Error::Parse(format!(
                "line {}: expected at least 6 comma-delimited fields, got {}: {line}",
                line_num + 1,
                fields.len()
            )));
        }

        let contig = normalize_contig_name(fields[0]);
        let fragment_id = normalize_contig_name(fields[2]);

        let num_genes_in_contig: u32 = parse_count(fields[1], "total gene count", line_num)?;
        let num_fragment_genes: u32 = parse_count(fields[3], "fragment gene count", line_num)?;
        let category: u8 = parse_count(fields[4], "category", line_num)?;

        // VirSorter leaves the hallmark column empty when no hallmark gene
        // was found; that means zero, not a malformed row.
        let num_hallmark_genes: u32 = if fields[5].is_empty() {
            0
        } else {
            parse_count(fields[5], "hallmark count", line_num)?
        };

        let (label, fragment) = if contig == fragment_id {
            let label = format!("phage_{next_phage}");
            next_phage += 1;
            (label, Fragment::WholeContig)
        } else {
            let (start_gene, stop_gene) =
                fragment_gene_range(&fragment_id).ok_or_else(|| {
                    Error::Parse(format!(
                        "line {}: fragment id '{fragment_id}' lacks a gene range suffix",
                        line_num + 1
                    ))
                })?;
            let start_bp = genes.lookup(&contig, start_gene)?.start;
            let stop_bp = genes.lookup(&contig, stop_gene)?.stop;
            let label = format!("prophage_{next_prophage}");
            next_prophage += 1;
            (
                label,
                Fragment::Prophage {
                    start_gene: start_gene.to_string(),
                    stop_gene: stop_gene.to_string(),
                    start_bp,
                    stop_bp,
                },
            )
        };

        predictions.insert(
            contig.clone(),
            Prediction {
                contig,
                num_genes_in_contig,
                fragment_id,
                num_fragment_genes,
                num_hallmark_genes,
                is_circular: is_circular(fields[0]),
                category,
                label,
                fragment,
            },
        );
    }

    Ok(predictions)
}

fn parse_count<T: std::str::FromStr>(field: &str, what: &str, line_num: usize) -> Result<T, Error>
where
    T::Err: std::fmt::Display,
{
    field.parse().map_err(|e| {
        Error::Parse(format!(
            "line {}: invalid {what} '{field}': {e}",
            line_num + 1
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affi::parse_affi_contigs;
    use std::io::Cursor;

    const AFFI: &str = "\
>VIRSorter_ctg1|10|cat2
VIRSorter_ctg1-gene_3|2001|3000
VIRSorter_ctg1-gene_7|6001|7000
>VIRSorter_ctg2-circular|4|cat1
VIRSorter_ctg2-gene_1|1|900
";

    fn gene_index() -> GeneIndex {
        parse_affi_contigs(Cursor::new(AFFI)).unwrap()
    }

    #[test]
    fn whole_contig_prediction() {
        let csv = "\
## Contig,Nb genes,Fragment,Nb genes,Category,Nb phage hallmark genes
VIRSorter_ctg2-circular,4,VIRSorter_ctg2-circular,4,1,2
";
        let preds = merge_predictions(Cursor::new(csv), &gene_index()).unwrap();
        assert_eq!(preds.len(), 1);

        let p = &preds["ctg2"];
        assert!(p.is_whole_contig());
        assert_eq!(p.label, "phage_1");
        assert_eq!(p.category, 1);
        assert_eq!(p.num_genes_in_contig, 4);
        assert_eq!(p.num_fragment_genes, 4);
        assert_eq!(p.num_hallmark_genes, 2);
        assert!(p.is_circular);
    }

    #[test]
    fn prophage_fragment_resolves_to_base_pairs() {
        let csv = "VIRSorter_ctg1,10,VIRSorter_ctg1-gene_3-gene_7,5,2,4\n";
        let preds = merge_predictions(Cursor::new(csv), &gene_index()).unwrap();

        let p = &preds["ctg1"];
        assert_eq!(p.label, "prophage_1");
        assert_eq!(p.category, 2);
        assert_eq!(p.num_fragment_genes, 5);
        assert_eq!(p.num_hallmark_genes, 4);
        assert!(!p.is_circular);
        assert_eq!(
            p.fragment,
            Fragment::Prophage {
                start_gene: "gene_3".to_string(),
                stop_gene: "gene_7".to_string(),
                start_bp: 2001,
                stop_bp: 7000,
            }
        );
    }

    #[test]
    fn counters_are_independent_and_ordered() {
        let csv = "\
VIRSorter_ctg2,4,VIRSorter_ctg2,4,1,0
VIRSorter_ctg1,10,VIRSorter_ctg1-gene_3-gene_7,5,2,1
VIRSorter_ctg3,6,VIRSorter_ctg3,6,3,0
";
        let affi = "\
>ctg1
ctg1-gene_3|2001|3000
ctg1-gene_7|6001|7000
";
        let genes = parse_affi_contigs(Cursor::new(affi)).unwrap();
        let preds = merge_predictions(Cursor::new(csv), &genes).unwrap();

        assert_eq!(preds["ctg2"].label, "phage_1");
        assert_eq!(preds["ctg3"].label, "phage_2");
        assert_eq!(preds["ctg1"].label, "prophage_1");
    }

    #[test]
    fn empty_hallmark_field_is_zero() {
        let csv = "VIRSorter_ctg2,4,VIRSorter_ctg2,4,1,\n";
        let preds = merge_predictions(Cursor::new(csv), &gene_index()).unwrap();
        assert_eq!(preds["ctg2"].num_hallmark_genes, 0);
    }

    #[test]
    fn comments_skipped() {
        let csv = "\
## sequences detected
# another comment
VIRSorter_ctg2,4,VIRSorter_ctg2,4,2,1
";
        let preds = merge_predictions(Cursor::new(csv), &gene_index()).unwrap();
        assert_eq!(preds.len(), 1);
    }

    #[test]
    fn unresolved_gene_reference_is_hard_error() {
        // gene_9 was never indexed for ctg1
        let csv = "VIRSorter_ctg1,10,VIRSorter_ctg1-gene_3-gene_9,7,2,0\n";
        let err = merge_predictions(Cursor::new(csv), &gene_index()).unwrap_err();
        assert!(matches!(err, Error::UnresolvedGene { .. }));
    }

    #[test]
    fn short_row_errors() {
        let csv = "VIRSorter_ctg1,10,VIRSorter_ctg1\n";
        let err = merge_predictions(Cursor::new(csv), &gene_index()).unwrap_err();
        assert!(err.to_string().contains("expected at least 6"));
    }

    #[test]
    fn bad_category_errors() {
        let csv = "VIRSorter_ctg2,4,VIRSorter_ctg2,4,high,1\n";
        let err = merge_predictions(Cursor::new(csv), &gene_index()).unwrap_err();
        assert!(err.to_string().contains("invalid category"));
    }

    #[test]
    fn duplicate_contig_last_row_wins() {
        let csv = "\
VIRSorter_ctg1,10,VIRSorter_ctg1,10,3,0
VIRSorter_ctg1,10,VIRSorter_ctg1-gene_3-gene_7,5,2,4
";
        let preds = merge_predictions(Cursor::new(csv), &gene_index()).unwrap();
        assert_eq!(preds.len(), 1);
        let p = &preds["ctg1"];
        assert!(!p.is_whole_contig());
        assert_eq!(p.category, 2);
        assert_eq!(p.label, "prophage_1");
    }
}
