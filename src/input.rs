//! Transparent opening of plain or gzip-compressed input tables.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Error;

/// Opens an input table for buffered line reading.
///
/// Files ending in `.gz` are decompressed on the fly.
pub fn open_table(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
