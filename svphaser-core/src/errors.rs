use thiserror::Error;

/// Errors raised while building [`crate::models::WorkerOpts`] from user input.
///
/// These are all fatal and surface before any chromosome is dispatched.
#[derive(Error, Debug, PartialEq)]
pub enum OptionsError {
    #[error("Malformed GQ bin '{0}': expected <threshold>:<label>")]
    MalformedBin(String),

    #[error("Invalid GQ bin threshold '{0}': expected a non-negative integer")]
    InvalidBinThreshold(String),

    #[error("GQ bin label '{0}' is empty or contains one of ' ', ',', ';', '=', ':'")]
    InvalidBinLabel(String),

    #[error("GQ bin threshold {0} appears more than once")]
    DuplicateBinThreshold(u32),

    #[error("major_delta must be in (0, 1], got {0}")]
    MajorDeltaOutOfRange(f64),

    #[error("equal_delta must be in [0, 1], got {0}")]
    EqualDeltaOutOfRange(f64),

    #[error("threads must be at least 1")]
    ZeroThreads,
}

pub type Result<T> = std::result::Result<T, OptionsError>;
