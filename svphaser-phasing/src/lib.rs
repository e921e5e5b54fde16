//! # SV phasing
//!
//! Assigns each structural variant in an unphased call set to a haplotype using
//! long reads already tagged with `HP`:
//!
//! - count HP1/HP2 reads around every variant ([`counting`])
//! - turn the two counts into a genotype and a Phred score ([`algorithms`])
//! - run one worker per chromosome on a rayon pool and merge the results ([`engine`])
//! - drop variants without per-haplotype support ([`filter`])
//! - write the annotated VCF and the CSV summaries ([`writing`])

pub mod algorithms;
pub mod counting;
pub mod engine;
pub mod errors;
pub mod filter;
pub mod settings;
pub mod worker;
pub mod writing;

pub use algorithms::{classify, classify_haplotype, phasing_quality};
pub use engine::{PhaseOutputs, PhaseResult, RunConfig, phase_vcf, run_phasing};
pub use errors::{PhasingError, Result};
pub use settings::PhaseSettings;
pub use writing::AnnotationReport;
