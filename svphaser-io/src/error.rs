use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for variant store and evidence source operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A file could not be opened.
    #[error("Can't open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A VCF data line could not be parsed.
    #[error("Malformed VCF record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// The tabix/CSI index could not be used.
    #[error("Index query failed for {}: {reason}", path.display())]
    Index { path: PathBuf, reason: String },

    /// The read evidence source failed while fetching an interval.
    #[error("Evidence fetch failed for {chrom}: {reason}")]
    Evidence { chrom: String, reason: String },

    /// The input header already declares an INFO key we inject.
    #[error("Input VCF already defines INFO/{0}; refusing to overwrite it")]
    AnnotationCollision(String),

    /// IO error occurred while reading.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type alias for svphaser-io operations.
pub type Result<T> = std::result::Result<T, StoreError>;
