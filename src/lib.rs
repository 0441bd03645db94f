//! Latitude-banded nearest-neighbor matching and resampling for satellite
//! swath geolocation.
//!
//! ```rust
//! use swathgrid::{PointSet, ResamplerBuilder};
//!
//! let resampler = ResamplerBuilder::new().build()?;
//!
//! let source = PointSet::from_degrees(&[0.0, 0.0], &[0.0, 0.1])?;
//! let target = PointSet::from_degrees(&[0.0], &[0.09])?;
//!
//! let values = resampler.resample_nearest(&source, &[1.0, 2.0], &target, 20_000.0)?;
//! assert_eq!(values, vec![Some(2.0)]);
//! # Ok::<(), swathgrid::SwathgridError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod ffi;
pub mod points;
pub mod resampler;

pub use builder::ResamplerBuilder;
pub use compute::index::{BandIndex, BandLayout};
pub use config::{Config, DistanceFormula, EARTH_RADIUS_METERS, ValueFilter};
pub use error::{Result, SwathgridError};
pub use points::{DegreeConversion, PointSet};
pub use resampler::Resampler;

pub use swathgrid_types::matching::Match;
pub use swathgrid_types::sentinel::{NO_DATA, NO_MATCH_DISTANCE, NO_MATCH_ID};
pub use swathgrid_types::summary::CellSummary;

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Resampler, ResamplerBuilder, Result, SwathgridError};

    pub use crate::{CellSummary, Match, PointSet};

    pub use crate::{Config, DistanceFormula, ValueFilter};

    pub use geo::Point;
}
