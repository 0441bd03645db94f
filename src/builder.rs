//! Resampler builder for flexible configuration
//!
//! Starts from [`Config::default()`] or a loaded configuration and lets
//! individual settings be overridden before the thread pool is created.

use crate::config::{Config, DistanceFormula, ValueFilter};
use crate::error::Result;
use crate::resampler::Resampler;
use std::path::Path;

/// Builder for [`Resampler`] instances.
#[derive(Debug, Clone)]
pub struct ResamplerBuilder {
    config: Config,
}

impl ResamplerBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Start from a configuration file (JSON, or TOML with the `toml` feature).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            config: Config::from_path(path)?,
        })
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Number of worker threads; `0` uses the global rayon pool.
    pub fn threads(mut self, threads: usize) -> Self {
        self.config = self.config.with_threads(threads);
        self
    }

    pub fn earth_radius(mut self, radius_m: f64) -> Self {
        self.config = self.config.with_earth_radius(radius_m);
        self
    }

    pub fn min_block_size(mut self, size_m: f64) -> Self {
        self.config = self.config.with_min_block_size(size_m);
        self
    }

    pub fn distance_formula(mut self, formula: DistanceFormula) -> Self {
        self.config = self.config.with_distance_formula(formula);
        self
    }

    pub fn value_filter(mut self, filter: ValueFilter) -> Self {
        self.config = self.config.with_value_filter(filter);
        self
    }

    /// Validate the configuration and build the resampler.
    pub fn build(self) -> Result<Resampler> {
        Resampler::with_config(self.config)
    }
}

impl Default for ResamplerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
