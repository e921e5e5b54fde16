//! Core models for svphaser.
//!
//! This crate holds the types every other svphaser crate agrees on:
//!
//! - [`models::SvKey`], the `(chrom, pos, id)` identity of a structural variant
//! - [`models::CallRecord`], the per-variant haplotype call
//! - [`models::ConfidenceBins`], the ordered `threshold:label` table for GQ labels
//! - [`models::WorkerOpts`], the immutable knobs handed to every chromosome worker

pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;

// re-exports
pub use errors::OptionsError;
pub use models::{CallRecord, ConfidenceBins, Genotype, GqBin, SvKey, WorkerOpts};
