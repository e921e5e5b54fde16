use std::io;
use std::path::PathBuf;

use thiserror::Error;

use svphaser_core::OptionsError;
use svphaser_io::StoreError;

#[derive(Error, Debug)]
pub enum PhasingError {
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A chromosome worker failed; the whole run is abandoned.
    #[error("Phasing failed on chromosome {chrom}: {source}")]
    Unit {
        chrom: String,
        #[source]
        source: StoreError,
    },

    #[error("Invalid settings file: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("Failed to write table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Failed to finalise {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PhasingError>;
