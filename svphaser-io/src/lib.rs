//! Collaborators the phasing engine reads from.
//!
//! - [`vcf::VariantStore`]: an SV call set on disk, iterated one chromosome at a time
//! - [`evidence::EvidenceSource`]: per-read haplotype labels over an interval, with a
//!   BAM implementation and an in-memory one
//!
//! Neither hands out long-lived reader objects: every call opens what it needs, so
//! values of these types can be shared with worker threads freely.

pub mod error;
pub mod evidence;
pub mod vcf;

pub use error::{Result, StoreError};
pub use evidence::{
    BamEvidenceOpener, BamEvidenceSource, EvidenceOpener, EvidenceSource, InMemoryEvidence,
    ReadEvidence,
};
pub use vcf::{VariantRecord, VariantStore, VcfHeader};
