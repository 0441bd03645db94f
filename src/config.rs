//! Resampler configuration.
//!
//! Every field has a serde default, so an empty JSON object (or TOML
//! document) yields [`Config::default()`].
use crate::error::{Result, SwathgridError};
use serde::de::Error;
use std::path::Path;

pub use swathgrid_types::options::{DistanceFormula, ValueFilter};

/// Mean Earth radius in meters used to convert between meters and angles.
pub const EARTH_RADIUS_METERS: f64 = 6_371_009.0;

/// Radii below this are still indexed with blocks of this size, which keeps
/// the band and block counts bounded for tiny radii.
pub const MIN_BLOCK_SIZE_METERS: f64 = 1000.0;

/// Resampler configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "Config::default_earth_radius")]
    pub earth_radius_m: f64,

    /// Lower bound on the block edge used when building the index
    #[serde(default = "Config::default_min_block_size")]
    pub min_block_size_m: f64,

    #[serde(default)]
    pub distance_formula: DistanceFormula,

    /// Which source values contribute to cell summaries
    #[serde(default)]
    pub value_filter: ValueFilter,

    /// Worker threads for searches; `0` runs on the global rayon pool
    #[serde(default)]
    pub threads: usize,
}

impl Config {
    const fn default_earth_radius() -> f64 {
        EARTH_RADIUS_METERS
    }

    const fn default_min_block_size() -> f64 {
        MIN_BLOCK_SIZE_METERS
    }

    pub fn with_earth_radius(mut self, radius_m: f64) -> Self {
        self.earth_radius_m = radius_m;
        self
    }

    pub fn with_min_block_size(mut self, size_m: f64) -> Self {
        self.min_block_size_m = size_m;
        self
    }

    pub fn with_distance_formula(mut self, formula: DistanceFormula) -> Self {
        self.distance_formula = formula;
        self
    }

    pub fn with_value_filter(mut self, filter: ValueFilter) -> Self {
        self.value_filter = filter;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        if threads > 1024 {
            log::warn!(
                "Thread count of {} is unusually large; searches are CPU-bound",
                threads
            );
        }
        self.threads = threads;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.earth_radius_m.is_finite() || self.earth_radius_m <= 0.0 {
            return Err(format!(
                "Earth radius must be positive and finite, got: {}",
                self.earth_radius_m
            ));
        }

        if !self.min_block_size_m.is_finite() || self.min_block_size_m <= 0.0 {
            return Err(format!(
                "Minimum block size must be positive and finite, got: {}",
                self.min_block_size_m
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Loads a configuration file, choosing the format from its extension.
    ///
    /// `.toml` files require the `toml` feature; anything else is parsed as
    /// JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            #[cfg(feature = "toml")]
            Some("toml") => {
                Self::from_toml(&contents).map_err(|e| SwathgridError::Toml(e.to_string()))
            }
            #[cfg(not(feature = "toml"))]
            Some("toml") => Err(SwathgridError::Config(format!(
                "{} is a TOML file but the `toml` feature is disabled",
                path.display()
            ))),
            _ => Ok(Self::from_json(&contents)?),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            earth_radius_m: Self::default_earth_radius(),
            min_block_size_m: Self::default_min_block_size(),
            distance_formula: DistanceFormula::default(),
            value_filter: ValueFilter::default(),
            threads: 0,
        }
    }
}
