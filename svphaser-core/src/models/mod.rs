pub mod bins;
pub mod call;
pub mod key;
pub mod opts;

// re-export for cleaner imports
pub use self::bins::{ConfidenceBins, GqBin};
pub use self::call::{CallRecord, Genotype};
pub use self::key::SvKey;
pub use self::opts::WorkerOpts;
