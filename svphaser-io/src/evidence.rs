//! Read evidence sources.
//!
//! A source answers one question: which reads overlap `chrom:start-end`, and what
//! haplotype label (the `HP` aux tag) does each carry. It reports every read with
//! its flags and leaves filtering to the caller.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use noodles::bam;
use noodles::bgzf;
use noodles::core::{Position, Region};
use noodles::sam;
use noodles::sam::alignment::record::data::field::{Tag, Value};

use svphaser_core::consts::HP_TAG;

use crate::error::{Result, StoreError};

/// What an alignment contributes to haplotype counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadEvidence {
    /// Integer value of the HP tag, `None` when the read has none
    pub haplotype: Option<i64>,
    pub is_unmapped: bool,
    pub is_secondary: bool,
    pub is_supplementary: bool,
}

impl ReadEvidence {
    /// An ordinary primary, mapped read.
    pub fn primary(haplotype: Option<i64>) -> Self {
        ReadEvidence {
            haplotype,
            ..Default::default()
        }
    }
}

/// Something that can list the reads overlapping an interval.
pub trait EvidenceSource {
    ///
    /// Reads overlapping `chrom:start-end` (1-based, inclusive).
    ///
    /// A chromosome the source knows nothing about yields no reads.
    ///
    fn fetch(&mut self, chrom: &str, start: u64, end: u64) -> Result<Vec<ReadEvidence>>;
}

///
/// Opens independent [`EvidenceSource`]s.
///
/// Each chromosome worker opens its own source and drops it when done, so
/// readers never cross a thread boundary; only the opener is shared.
///
pub trait EvidenceOpener: Sync {
    type Source: EvidenceSource;

    fn open(&self) -> Result<Self::Source>;
}

/// Opens indexed BAM readers on one file.
#[derive(Debug, Clone)]
pub struct BamEvidenceOpener {
    path: PathBuf,
}

impl BamEvidenceOpener {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        BamEvidenceOpener {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EvidenceOpener for BamEvidenceOpener {
    type Source = BamEvidenceSource;

    fn open(&self) -> Result<BamEvidenceSource> {
        BamEvidenceSource::open(&self.path)
    }
}

/// An indexed BAM reader. Requires a `.bai` or `.csi` next to the BAM.
pub struct BamEvidenceSource {
    reader: bam::io::IndexedReader<bgzf::Reader<File>>,
    header: sam::Header,
}

impl BamEvidenceSource {
    pub fn open(path: &Path) -> Result<Self> {
        let open_error = |source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = bam::io::indexed_reader::Builder::default()
            .build_from_path(path)
            .map_err(open_error)?;
        let header = reader.read_header().map_err(open_error)?;

        Ok(BamEvidenceSource { reader, header })
    }
}

fn haplotype_label(value: Value<'_>) -> Option<i64> {
    match value {
        Value::Int8(n) => Some(i64::from(n)),
        Value::UInt8(n) => Some(i64::from(n)),
        Value::Int16(n) => Some(i64::from(n)),
        Value::UInt16(n) => Some(i64::from(n)),
        Value::Int32(n) => Some(i64::from(n)),
        Value::UInt32(n) => Some(i64::from(n)),
        _ => None,
    }
}

impl EvidenceSource for BamEvidenceSource {
    fn fetch(&mut self, chrom: &str, start: u64, end: u64) -> Result<Vec<ReadEvidence>> {
        if !self
            .header
            .reference_sequences()
            .contains_key(chrom.as_bytes())
        {
            return Ok(Vec::new());
        }

        let fetch_error = |reason: String| StoreError::Evidence {
            chrom: chrom.to_string(),
            reason,
        };

        let start = start.max(1);
        let end = end.max(start);
        let start = Position::try_from(start as usize)
            .map_err(|e| fetch_error(format!("invalid start {}: {}", start, e)))?;
        let end = Position::try_from(end as usize)
            .map_err(|e| fetch_error(format!("invalid end {}: {}", end, e)))?;
        let region = Region::new(chrom, start..=end);

        let query = self
            .reader
            .query(&self.header, &region)
            .map_err(|e| fetch_error(e.to_string()))?;

        let tag = Tag::from(HP_TAG);
        let mut reads = Vec::new();

        for result in query {
            let record = result?;
            let flags = record.flags();

            let haplotype = match record.data().get(&tag) {
                Some(Ok(value)) => haplotype_label(value),
                Some(Err(e)) => return Err(fetch_error(format!("unreadable HP tag: {}", e))),
                None => None,
            };

            reads.push(ReadEvidence {
                haplotype,
                is_unmapped: flags.is_unmapped(),
                is_secondary: flags.is_secondary(),
                is_supplementary: flags.is_supplementary(),
            });
        }

        Ok(reads)
    }
}

/// A read placed on a chromosome, for [`InMemoryEvidence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedRead {
    pub chrom: String,
    /// 1-based inclusive alignment span
    pub start: u64,
    pub end: u64,
    pub evidence: ReadEvidence,
}

///
/// Reads held in memory, shared behind an `Arc`.
///
/// Acts as both opener and source: opening hands out a cheap clone.
///
#[derive(Debug, Clone, Default)]
pub struct InMemoryEvidence {
    reads: Arc<Vec<PlacedRead>>,
}

impl InMemoryEvidence {
    pub fn new(reads: Vec<PlacedRead>) -> Self {
        InMemoryEvidence {
            reads: Arc::new(reads),
        }
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }
}

impl EvidenceSource for InMemoryEvidence {
    fn fetch(&mut self, chrom: &str, start: u64, end: u64) -> Result<Vec<ReadEvidence>> {
        Ok(self
            .reads
            .iter()
            .filter(|r| r.chrom == chrom && r.start <= end && r.end >= start)
            .map(|r| r.evidence)
            .collect())
    }
}

impl EvidenceOpener for InMemoryEvidence {
    type Source = InMemoryEvidence;

    fn open(&self) -> Result<InMemoryEvidence> {
        Ok(self.clone())
    }
}
