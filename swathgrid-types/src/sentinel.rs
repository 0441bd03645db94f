//! Reserved numeric values used at the flat-buffer boundary.
//!
//! Inside the kernel absence is always an `Option`; these values only appear
//! when results are written into caller-owned buffers.

/// Written to ID buffers when no point lies within the search radius.
pub const NO_MATCH_ID: i32 = -1;

/// Written to distance buffers when no point lies within the search radius.
pub const NO_MATCH_DISTANCE: f64 = -1.0;

/// Missing-data marker for value buffers (radiances, means, deviations).
pub const NO_DATA: f64 = -999.0;

/// Returns true when `value` is exactly the missing-data marker.
#[inline]
pub fn is_no_data(value: f64) -> bool {
    value == NO_DATA
}

/// Maps an optional value to the buffer representation.
#[inline]
pub fn value_or_no_data(value: Option<f64>) -> f64 {
    value.unwrap_or(NO_DATA)
}
