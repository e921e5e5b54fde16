//! Structural variant phasing from HP-tagged long reads.
//!
//! Each part of the toolkit is its own crate, re-exported here behind a feature:
//!
//! - `core`: shared models such as `CallRecord` and `WorkerOpts`
//! - `io`: the VCF variant store and BAM read evidence
//! - `phasing`: the classifier, the chromosome-parallel engine and the writers (default)

#[cfg(feature = "core")]
#[doc(inline)]
pub use svphaser_core as core;

#[cfg(feature = "io")]
#[doc(inline)]
pub use svphaser_io as io;

#[cfg(feature = "phasing")]
#[doc(inline)]
pub use svphaser_phasing as phasing;
