//! Run settings, layered from defaults, an optional TOML file and CLI flags.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use svphaser_core::consts::{
    DEFAULT_EQUAL_DELTA, DEFAULT_GQ_BINS, DEFAULT_MAJOR_DELTA, DEFAULT_MIN_SUPPORT,
};
use svphaser_core::{ConfidenceBins, OptionsError, WorkerOpts};

use crate::engine::RunConfig;
use crate::errors::Result;

///
/// User-facing phasing settings. Unset fields fall back to the built-in defaults.
///
/// ```toml
/// min_support = 8
/// major_delta = 0.75
/// gq_bins = "40:High,20:Moderate,5:Low"
/// threads = 4
/// ```
///
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseSettings {
    pub min_support: Option<u32>,
    pub major_delta: Option<f64>,
    pub equal_delta: Option<f64>,
    pub gq_bins: Option<String>,
    pub threads: Option<usize>,
    pub progress: Option<bool>,
}

impl PhaseSettings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    ///
    /// Layer `overrides` on top of `self`: any field set there wins.
    ///
    pub fn merge(self, overrides: PhaseSettings) -> PhaseSettings {
        PhaseSettings {
            min_support: overrides.min_support.or(self.min_support),
            major_delta: overrides.major_delta.or(self.major_delta),
            equal_delta: overrides.equal_delta.or(self.equal_delta),
            gq_bins: overrides.gq_bins.or(self.gq_bins),
            threads: overrides.threads.or(self.threads),
            progress: overrides.progress.or(self.progress),
        }
    }

    ///
    /// Resolve defaults and check every value, producing the immutable run config.
    ///
    pub fn validate(&self) -> Result<RunConfig> {
        let gq_bins: ConfidenceBins = self
            .gq_bins
            .as_deref()
            .unwrap_or(DEFAULT_GQ_BINS)
            .parse()?;

        let opts = WorkerOpts::new(
            self.min_support.unwrap_or(DEFAULT_MIN_SUPPORT),
            self.major_delta.unwrap_or(DEFAULT_MAJOR_DELTA),
            self.equal_delta.unwrap_or(DEFAULT_EQUAL_DELTA),
            gq_bins,
        )?;

        let threads = match self.threads {
            Some(0) => return Err(OptionsError::ZeroThreads.into()),
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };

        Ok(RunConfig {
            opts,
            threads,
            progress: self.progress.unwrap_or(false),
        })
    }
}
