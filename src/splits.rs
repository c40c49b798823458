//! Parser for the Anvi'o splits_basic_info.txt table.
//!
//! Splits are the fixed-size sub-ranges Anvi'o cuts contigs into for binning
//! and visualization. Each row carries the split's base-pair range within its
//! parent contig plus its length; parent totals are recovered by summing the
//! lengths of a parent's splits.

use std::collections::HashMap;
use std::io::BufRead;

use crate::error::Error;

/// One split row: a base-pair sub-range of a parent contig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRecord {
    pub name: String,
    pub start: i64,
    pub stop: i64,
    pub length: i64,
    pub parent: String,
}

/// Parses the tab-delimited splits table. The first line is a header and is
/// always skipped.
pub fn parse_splits_table<R: BufRead>(reader: R) -> Result<Vec<SplitRecord>, Error> {
    let mut splits = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line_num == 0 {
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            return Err(Error::Parse(format!(
                "line {}: expected at least 8 tab-delimited fields, got {}: {line}",
                line_num + 1,
                fields.len()
            )));
        }

        let parse_bp = |field: &str, what: &str| -> Result<i64, Error> {
            field.parse().map_err(|e| {
                Error::Parse(format!(
                    "line {}: invalid {what} '{field}': {e}",
                    line_num + 1
                ))
            })
        };

        splits.push(SplitRecord {
            name: fields[0].to_string(),
            start: parse_bp(fields[2], "split start")?,
            stop: parse_bp(fields[3], "split end")?,
            length: parse_bp(fields[4], "split length")?,
            parent: fields[7].to_string(),
        });
    }

    Ok(splits)
}

/// Sums split lengths per parent contig.
///
/// A parent that contributed no splits is absent from the map; absence, not
/// zero, is the no-data signal.
#[must_use]
pub fn total_parent_lengths(splits: &[SplitRecord]) -> HashMap<String, i64> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for split in splits {
        *totals.entry(split.parent.clone()).or_insert(0) += split.length;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
split\torder_in_parent\tstart\tend\tlength\tgc_content\tgc_content_parent\tparent
ctg1_split_00001\t0\t0\t20000\t20000\t0.41\t0.40\tctg1
ctg1_split_00002\t1\t20000\t33000\t13000\t0.39\t0.40\tctg1
ctg2_split_00001\t0\t0\t9000\t9000\t0.52\t0.52\tctg2
";

    #[test]
    fn parse_rows() {
        let splits = parse_splits_table(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(splits.len(), 3);
        assert_eq!(
            splits[0],
            SplitRecord {
                name: "ctg1_split_00001".to_string(),
                start: 0,
                stop: 20000,
                length: 20000,
                parent: "ctg1".to_string(),
            }
        );
        assert_eq!(splits[2].parent, "ctg2");
    }

    #[test]
    fn header_always_skipped() {
        // Even a header that happens to look like data is dropped.
        let input = "a\t0\t0\t1\t1\t0\t0\tp\nx\t0\t0\t5\t5\t0\t0\tp\n";
        let splits = parse_splits_table(Cursor::new(input)).unwrap();
        assert_eq!(splits.len(), 1);
        assert_eq!(splits[0].name, "x");
    }

    #[test]
    fn short_row_errors() {
        let input = "header\nctg1_split_00001\t0\t0\t20000\n";
        let err = parse_splits_table(Cursor::new(input)).unwrap_err();
        assert!(err.to_string().contains("expected at least 8"));
    }

    #[test]
    fn bad_length_errors() {
        let input = "header\ns\t0\t0\t100\tlots\t0\t0\tp\n";
        let err = parse_splits_table(Cursor::new(input)).unwrap_err();
        assert!(err.to_string().contains("invalid split length"));
    }

    #[test]
    fn totals_sum_per_parent() {
        let splits = parse_splits_table(Cursor::new(SAMPLE)).unwrap();
        let totals = total_parent_lengths(&splits);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["ctg1"], 33000);
        assert_eq!(totals["ctg2"], 9000);
    }

    #[test]
    fn absent_parent_has_no_entry() {
        let splits = parse_splits_table(Cursor::new(SAMPLE)).unwrap();
        let totals = total_parent_lengths(&splits);
        assert!(!totals.contains_key("ctg3"));
    }

    #[test]
    fn empty_table_gives_empty_totals() {
        let totals = total_parent_lengths(&[]);
        assert!(totals.is_empty());
    }
}
