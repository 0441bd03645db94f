//! Point sets in radians and the degree conversion that produces them.

use crate::compute::validation::{validate_len, validate_point_count};
use crate::error::Result;
use geo::Point;
use rayon::prelude::*;

/// How degree coordinates supplied by a caller become radians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegreeConversion {
    /// Convert into a new buffer; caller data is left untouched.
    #[default]
    Copy,
    /// Overwrite the caller's buffers with radians before copying them.
    InPlace,
}

/// Converts degree buffers to radians in place.
pub fn degrees_to_radians_in_place(lat: &mut [f64], lon: &mut [f64]) {
    lat.par_iter_mut().for_each(|v| *v = v.to_radians());
    lon.par_iter_mut().for_each(|v| *v = v.to_radians());
}

/// A set of points with contiguous IDs `0..len()`, in radians.
///
/// Coordinates are not range-checked: fill values such as `-999` degrees are
/// legal here and simply never land in an index band.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    lat: Vec<f64>,
    lon: Vec<f64>,
}

impl PointSet {
    /// Wraps coordinates already in radians.
    pub fn from_radians(lat: Vec<f64>, lon: Vec<f64>) -> Result<Self> {
        validate_len("longitudes", lat.len(), lon.len())?;
        validate_point_count("point set", lat.len())?;
        Ok(Self { lat, lon })
    }

    /// Copies and converts degree coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use swathgrid::PointSet;
    ///
    /// let lat = [10.0, 20.0];
    /// let lon = [-30.0, 40.0];
    /// let points = PointSet::from_degrees(&lat, &lon)?;
    /// assert_eq!(points.len(), 2);
    /// assert_eq!(lat[0], 10.0); // caller data untouched
    /// # Ok::<(), swathgrid::SwathgridError>(())
    /// ```
    pub fn from_degrees(lat: &[f64], lon: &[f64]) -> Result<Self> {
        validate_len("longitudes", lat.len(), lon.len())?;
        Self::from_radians(
            lat.iter().map(|v| v.to_radians()).collect(),
            lon.iter().map(|v| v.to_radians()).collect(),
        )
    }

    /// Builds a point set from degree buffers using the given conversion.
    ///
    /// With [`DegreeConversion::InPlace`] the caller's buffers hold radians
    /// afterwards. Lengths are validated before anything is modified.
    pub fn from_degrees_with(
        lat: &mut [f64],
        lon: &mut [f64],
        conversion: DegreeConversion,
    ) -> Result<Self> {
        validate_len("longitudes", lat.len(), lon.len())?;
        match conversion {
            DegreeConversion::Copy => Self::from_degrees(lat, lon),
            DegreeConversion::InPlace => {
                validate_point_count("point set", lat.len())?;
                degrees_to_radians_in_place(lat, lon);
                Self::from_radians(lat.to_vec(), lon.to_vec())
            }
        }
    }

    /// Builds a point set from `geo` points (x = longitude, y = latitude, degrees).
    pub fn from_points(points: &[Point<f64>]) -> Result<Self> {
        Self::from_radians(
            points.iter().map(|p| p.y().to_radians()).collect(),
            points.iter().map(|p| p.x().to_radians()).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    /// Latitude and longitude of point `id`, in radians.
    pub fn get(&self, id: usize) -> Option<(f64, f64)> {
        Some((*self.lat.get(id)?, *self.lon.get(id)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lat.iter().copied().zip(self.lon.iter().copied())
    }
}
