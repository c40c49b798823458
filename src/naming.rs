//! Identifier normalization shared by all three VirSorter table parsers.
//!
//! VirSorter decorates sequence names with a `VIRSorter_` prefix and a
//! `-circular` suffix. Anvi'o knows the contigs by their original names, so
//! every identifier is stripped of both decorations before being used as a
//! key. The same normalized form must come out of all three parsers for the
//! cross-table joins to hold.

/// Strips the `VIRSorter_` and `-circular` decorations from a sequence name.
#[must_use]
pub fn normalize_contig_name(raw: &str) -> String {
    raw.replace("VIRSorter_", "").replace("-circular", "")
}

/// Returns true when the raw (undecorated) name marks a circular contig.
#[must_use]
pub fn is_circular(raw: &str) -> bool {
    raw.contains("-circular")
}

/// Reduces a gene identifier to its final dash-delimited token.
///
/// VirSorter gene ids carry the contig name as a prefix
/// (`VIRSorter_ctg1-gene_5`); only the trailing token identifies the gene
/// within its contig block.
#[must_use]
pub fn gene_token(gene_id: &str) -> &str {
    gene_id.rsplit('-').next().unwrap_or(gene_id)
}

/// Extracts the start and stop gene tokens from a prophage fragment id.
///
/// Fragment ids of sub-contig predictions end in two dash-delimited gene
/// tokens (`ctg1-gene_3-gene_7`). Returns `None` when the id has no such
/// suffix.
#[must_use]
pub fn fragment_gene_range(fragment_id: &str) -> Option<(&str, &str)> {
    let mut rev = fragment_id.rsplit('-');
    let stop = rev.next()?;
    let start = rev.next()?;
    // A bare contig name with a single dash has no room left for the
    // contig itself.
    rev.next()?;
    Some((start, stop))
}
