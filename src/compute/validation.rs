//! Input validation shared by the Rust API and the C boundary.

use crate::error::{Result, SwathgridError};

/// Largest point count an index or boundary ID can address.
pub const MAX_POINTS: usize = i32::MAX as usize;

/// Validates a search radius in meters.
///
/// # Examples
///
/// ```
/// use swathgrid::compute::validation::validate_radius;
///
/// assert!(validate_radius(555.0).is_ok());
/// assert!(validate_radius(0.0).is_err());
/// assert!(validate_radius(-100.0).is_err());
/// assert!(validate_radius(f64::NAN).is_err());
/// ```
pub fn validate_radius(radius_m: f64) -> Result<()> {
    if !radius_m.is_finite() {
        return Err(SwathgridError::InvalidInput(format!(
            "Radius must be finite, got: {}",
            radius_m
        )));
    }

    if radius_m <= 0.0 {
        return Err(SwathgridError::InvalidInput(format!(
            "Radius must be positive, got: {}",
            radius_m
        )));
    }

    Ok(())
}

/// Checks that a companion buffer has the expected length.
pub fn validate_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(SwathgridError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Rejects point sets too large to be addressed by boundary IDs.
pub fn validate_point_count(what: &'static str, count: usize) -> Result<()> {
    if count > MAX_POINTS {
        return Err(SwathgridError::InvalidInput(format!(
            "{} has {} points, more than the supported maximum of {}",
            what, count, MAX_POINTS
        )));
    }
    Ok(())
}

/// Validates that every present ID addresses an element of a set of `len`.
pub fn validate_ids<I>(what: &'static str, ids: I, len: usize) -> Result<()>
where
    I: IntoIterator<Item = Option<usize>>,
{
    for (idx, id) in ids.into_iter().enumerate() {
        if let Some(id) = id
            && id >= len
        {
            return Err(SwathgridError::InvalidInput(format!(
                "{} at index {} refers to {}, but only {} exist",
                what, idx, id, len
            )));
        }
    }
    Ok(())
}
