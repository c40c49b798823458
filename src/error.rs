//! Error types for the viranvio library.

use thiserror::Error;

/// Errors that can occur while parsing and projecting VirSorter predictions.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A prophage fragment references a gene that the affi table never
    /// defined for its contig. Happens when the predicted region runs past
    /// the indexed gene range, e.g. across the origin of a circular contig.
    #[error("gene '{gene}' of contig '{contig}' is not in the affi table")]
    UnresolvedGene { contig: String, gene: String },
}
