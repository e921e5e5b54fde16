use crate::consts::{
    DEFAULT_EQUAL_DELTA, DEFAULT_GQ_BINS, DEFAULT_MAJOR_DELTA, DEFAULT_MIN_SUPPORT,
};
use crate::errors::OptionsError;
use crate::models::bins::ConfidenceBins;

///
/// Non-changing knobs passed into every chromosome worker.
///
/// Built once by the orchestrator and shared read-only across the pool; fields
/// are private so a validated instance cannot drift out of range.
///
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerOpts {
    min_support: u32,
    major_delta: f64,
    equal_delta: f64,
    gq_bins: ConfidenceBins,
}

impl WorkerOpts {
    pub fn new(
        min_support: u32,
        major_delta: f64,
        equal_delta: f64,
        gq_bins: ConfidenceBins,
    ) -> Result<Self, OptionsError> {
        if !(major_delta > 0.0 && major_delta <= 1.0) {
            return Err(OptionsError::MajorDeltaOutOfRange(major_delta));
        }
        if !(0.0..=1.0).contains(&equal_delta) {
            return Err(OptionsError::EqualDeltaOutOfRange(equal_delta));
        }

        Ok(WorkerOpts {
            min_support,
            major_delta,
            equal_delta,
            gq_bins,
        })
    }

    pub fn min_support(&self) -> u32 {
        self.min_support
    }

    pub fn major_delta(&self) -> f64 {
        self.major_delta
    }

    pub fn equal_delta(&self) -> f64 {
        self.equal_delta
    }

    pub fn gq_bins(&self) -> &ConfidenceBins {
        &self.gq_bins
    }
}

impl Default for WorkerOpts {
    fn default() -> Self {
        WorkerOpts {
            min_support: DEFAULT_MIN_SUPPORT,
            major_delta: DEFAULT_MAJOR_DELTA,
            equal_delta: DEFAULT_EQUAL_DELTA,
            gq_bins: DEFAULT_GQ_BINS.parse().unwrap_or_default(),
        }
    }
}
