//! Parser for the VIRSorter_affi-contigs.tab gene-prediction table.
//!
//! The table is the input to VirSorter's step 3 and is organized in contig
//! blocks: a header line starting with `>` names the contig, and the
//! pipe-delimited lines below it describe that contig's predicted genes.
//! Prophage fragments express their boundaries in gene ordinals, so this is
//! the only place where those ordinals can be translated to base-pair
//! positions along the contig.

use std::collections::HashMap;
use std::io::BufRead;

use crate::error::Error;
use crate::naming::{gene_token, normalize_contig_name};

/// Base-pair coordinates of a single predicted gene (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneCoordinates {
    pub start: i64,
    pub stop: i64,
}

/// Lookup from (normalized contig name, gene token) to gene coordinates.
#[derive(Debug, Default)]
pub struct GeneIndex {
    contigs: HashMap<String, HashMap<String, GeneCoordinates>>,
}

impl GeneIndex {
    /// Resolves a gene token within a contig to its base-pair coordinates.
    ///
    /// Fails when the contig or the gene was never observed. There is no
    /// wraparound for circular contigs: a fragment spanning the origin
    /// references tokens outside the indexed range and is unresolvable.
    pub fn lookup(&self, contig: &str, gene: &str) -> Result<GeneCoordinates, Error> {
        self.contigs
            .get(contig)
            .and_then(|genes| genes.get(gene))
            .copied()
            .ok_or_else(|| Error::UnresolvedGene {
                contig: contig.to_string(),
                gene: gene.to_string(),
            })
    }

    #[must_use]
    pub fn contig_count(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.contigs.values().map(HashMap::len).sum()
    }
}

/// Parses the affi-contigs table into a [`GeneIndex`].
///
/// Gene identifiers are reduced to their final dash-delimited token before
/// indexing, matching the tokens that prophage fragment ids carry.
pub fn parse_affi_contigs<R: BufRead>(reader: R) -> Result<GeneIndex, Error> {
    let mut index = GeneIndex::default();
    let mut current: Option<(String, HashMap<String, GeneCoordinates>)> = None;

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            // Finish the previous block
            if let Some((contig, genes)) = current.take() {
                index.contigs.entry(contig).or_default().extend(genes);
            }
            let contig_field = header.split('|').next().unwrap_or(header);
            current = Some((normalize_contig_name(contig_field), HashMap::new()));
            continue;
        }

        let Some((_, genes)) = current.as_mut() else {
            return Err(Error::Parse(format!(
                "line {}: gene row before any contig header: {line}",
                line_num + 1
            )));
        };

        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < 3 {
            return Err(Error::Parse(format!(
                "line {}: expected at least 3 pipe-delimited fields, got {}: {line}",
                line_num + 1,
                fields.len()
            )));
        }

        let gene = gene_token(fields[0]).to_string();
        let start: i64 = fields[1].parse().map_err(|e| {
            Error::Parse(format!(
                "line {}: invalid gene start '{}': {e}",
                line_num + 1,
                fields[1]
            ))
        })?;
        let stop: i64 = fields[2].parse().map_err(|e| {
            Error::Parse(format!(
                "line {}: invalid gene stop '{}': {e}",
                line_num + 1,
                fields[2]
            ))
        })?;

        genes.insert(gene, GeneCoordinates { start, stop });
    }

    // Don't forget the last block
    if let Some((contig, genes)) = current {
        index.contigs.entry(contig).or_default().extend(genes);
    }

    Ok(index)
}
