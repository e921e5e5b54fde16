use std::fmt::{self, Display};
use std::str::FromStr;

use crate::models::key::SvKey;

/// Haplotype assignment of a structural variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genotype {
    /// `1|0`, carried by haplotype 1
    Hap1,
    /// `0|1`, carried by haplotype 2
    Hap2,
    /// `1|1`, near-tie between the haplotypes
    Both,
    /// `./.`, too little or ambiguous evidence
    Unphased,
}

impl Genotype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Genotype::Hap1 => "1|0",
            Genotype::Hap2 => "0|1",
            Genotype::Both => "1|1",
            Genotype::Unphased => "./.",
        }
    }
}

impl Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genotype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1|0" => Ok(Genotype::Hap1),
            "0|1" => Ok(Genotype::Hap2),
            "1|1" => Ok(Genotype::Both),
            "./." => Ok(Genotype::Unphased),
            _ => Err(format!("Unknown genotype: {}", s)),
        }
    }
}

///
/// One phased structural variant: the read support on each haplotype and the call
/// derived from it. Immutable once produced by a chromosome worker.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    /// index of the source record among its chromosome's records, in file order
    pub ordinal: usize,
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    pub svtype: String,
    pub n1: u32,
    pub n2: u32,
    pub genotype: Genotype,
    pub gq: u8,
    pub gq_label: Option<String>,
}

impl CallRecord {
    pub fn key(&self) -> SvKey {
        SvKey::new(self.chrom.clone(), self.pos, self.id.clone())
    }

    ///
    /// Whether at least one haplotype alone has `min_support` reads.
    ///
    /// Note this is stricter than the summed check used while classifying.
    ///
    pub fn has_haplotype_support(&self, min_support: u32) -> bool {
        self.n1 >= min_support || self.n2 >= min_support
    }
}
