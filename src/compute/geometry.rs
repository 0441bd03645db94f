//! Spherical geometry on radian coordinates.

use crate::config::DistanceFormula;
use std::f64::consts::{FRAC_PI_2, PI};

/// Angle subtended by `meters` on a sphere of `earth_radius_m`.
#[inline]
pub fn meters_to_radians(meters: f64, earth_radius_m: f64) -> f64 {
    meters / earth_radius_m
}

/// Arc length of `radians` on a sphere of `earth_radius_m`.
#[inline]
pub fn radians_to_meters(radians: f64, earth_radius_m: f64) -> f64 {
    radians * earth_radius_m
}

/// Great-circle angle between two points given as (lat, lon) radians.
#[inline]
pub fn angular_distance(
    formula: DistanceFormula,
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> f64 {
    match formula {
        DistanceFormula::SphericalCosines => spherical_cosines(lat1, lon1, lat2, lon2),
        DistanceFormula::Haversine => haversine(lat1, lon1, lat2, lon2),
    }
}

/// Spherical law of cosines.
///
/// The cosine is clamped to [-1, 1]; unclamped, identical points can round
/// to slightly above 1 and yield NaN, which never compares as within range.
#[inline]
pub fn spherical_cosines(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos();
    cos_angle.clamp(-1.0, 1.0).acos()
}

#[inline]
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let a = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt())
}

/// Offset of `lat` from the south pole, the coordinate bands are cut along.
#[inline]
pub(crate) fn lat_from_south(lat: f64) -> f64 {
    lat + FRAC_PI_2
}

/// Offset of `lon` from the antimeridian, the coordinate blocks are cut along.
#[inline]
pub(crate) fn lon_from_antimeridian(lon: f64) -> f64 {
    lon + PI
}
