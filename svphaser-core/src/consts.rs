/// Phred confidence ceiling (VCF convention).
pub const MAX_GQ: u8 = 99;

/// Depth above which the exact binomial tail is replaced by the normal approximation.
pub const NORMAL_THRESHOLD: u32 = 200;

/// Floor applied to the tail probability before taking its logarithm.
pub const MIN_TAIL_PROBABILITY: f64 = 1e-300;

pub const DEFAULT_MIN_SUPPORT: u32 = 10;
pub const DEFAULT_MAJOR_DELTA: f64 = 0.70;
pub const DEFAULT_EQUAL_DELTA: f64 = 0.25;
pub const DEFAULT_GQ_BINS: &str = "30:High,10:Moderate";

/// The per-read aux tag carrying the haplotype label.
pub const HP_TAG: [u8; 2] = [b'H', b'P'];

// INFO keys injected into the phased VCF
pub const INFO_GT_KEY: &str = "HP_GT";
pub const INFO_GQ_KEY: &str = "HP_GQ";
pub const INFO_GQBIN_KEY: &str = "HP_GQBIN";

/// Value written when a record carries no SVTYPE.
pub const MISSING_SVTYPE: &str = "NA";

/// The VCF missing-value sentinel, also used as the identifier of unnamed records.
pub const MISSING_ID: &str = ".";
