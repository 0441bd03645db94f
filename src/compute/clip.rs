//! Post-filter that propagates missing data from a mask.

use crate::compute::validation::validate_len;
use crate::error::Result;
use swathgrid_types::sentinel::{NO_DATA, is_no_data};

/// Sets `values[i]` to the no-data marker wherever `mask[i]` is no-data.
///
/// Returns how many entries were masked. Every other value is left as is.
///
/// # Examples
///
/// ```
/// use swathgrid::compute::clip::clip_to_mask;
///
/// let mut values = [1.0, 2.0, 3.0];
/// let masked = clip_to_mask(&mut values, &[0.0, -999.0, 5.0])?;
/// assert_eq!(masked, 1);
/// assert_eq!(values, [1.0, -999.0, 3.0]);
/// # Ok::<(), swathgrid::SwathgridError>(())
/// ```
pub fn clip_to_mask(values: &mut [f64], mask: &[f64]) -> Result<usize> {
    validate_len("clipping mask", values.len(), mask.len())?;

    let mut masked = 0;
    for (value, &m) in values.iter_mut().zip(mask) {
        if is_no_data(m) {
            *value = NO_DATA;
            masked += 1;
        }
    }
    Ok(masked)
}
