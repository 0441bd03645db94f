//! C-compatible FFI for swathgrid.
//!
//! These functions take caller-owned flat buffers and write results with
//! the numeric sentinels of [`swathgrid_types::sentinel`]: `-1` for missing
//! IDs and distances, `-999` for missing values.
//!
//! The API follows a status-code pattern: `0` indicates success and
//! negative numbers indicate errors. Output buffers are written only after
//! the whole computation has succeeded, so a failed call leaves them
//! untouched. The message of the most recent failure on the calling thread
//! is available through [`swathgrid_last_error_message`].

use crate::compute::index::BandIndex;
use crate::compute::{clip, transfer};
use crate::error::{Result, SwathgridError};
use crate::points::PointSet;
use crate::resampler::Resampler;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::{ptr, slice};
use swathgrid_types::matching::Match;

/// Generic success status.
pub const SWATHGRID_OK: c_int = 0;
/// Returned when the provided arguments are null or otherwise invalid.
pub const SWATHGRID_ERR_INVALID_ARGUMENT: c_int = -1;
/// Returned when an internal operation fails.
pub const SWATHGRID_ERR_OPERATION_FAILED: c_int = -2;
/// Returned when a working buffer could not be allocated.
pub const SWATHGRID_ERR_ALLOCATION_FAILED: c_int = -3;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn status_of(err: &SwathgridError) -> c_int {
    match err {
        SwathgridError::InvalidInput(_)
        | SwathgridError::LengthMismatch { .. }
        | SwathgridError::Config(_) => SWATHGRID_ERR_INVALID_ARGUMENT,
        SwathgridError::AllocationFailed { .. } => SWATHGRID_ERR_ALLOCATION_FAILED,
        _ => SWATHGRID_ERR_OPERATION_FAILED,
    }
}

fn set_last_error(message: Option<String>) {
    let message = message.map(|m| {
        // Interior NULs cannot cross the boundary.
        CString::new(m.replace('\0', " ")).unwrap_or_default()
    });
    LAST_ERROR.with(|slot| *slot.borrow_mut() = message);
}

/// Runs one boundary call, translating its result into a status code.
fn run<F>(name: &str, f: F) -> c_int
where
    F: FnOnce() -> Result<()>,
{
    match f() {
        Ok(()) => {
            set_last_error(None);
            SWATHGRID_OK
        }
        Err(err) => {
            log::debug!("{} failed: {}", name, err);
            let status = status_of(&err);
            set_last_error(Some(err.to_string()));
            status
        }
    }
}

fn count(what: &'static str, n: c_int) -> Result<usize> {
    usize::try_from(n)
        .map_err(|_| SwathgridError::InvalidInput(format!("{} must not be negative, got: {}", what, n)))
}

/// # Safety
/// A non-null `ptr` must be valid for reads of `len` elements for `'a`.
unsafe fn input<'a, T>(what: &'static str, ptr: *const T, len: usize) -> Result<&'a [T]> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(SwathgridError::InvalidInput(format!("{} is null", what)));
    }
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

/// # Safety
/// A non-null `ptr` must be valid for writes of `len` elements for `'a`
/// and not be accessed through any other pointer meanwhile.
unsafe fn output<'a, T>(what: &'static str, ptr: *mut T, len: usize) -> Result<&'a mut [T]> {
    if len == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() {
        return Err(SwathgridError::InvalidInput(format!("{} is null", what)));
    }
    Ok(unsafe { slice::from_raw_parts_mut(ptr, len) })
}

fn overlaps(a: *const f64, b: *const f64, len_a: usize, len_b: usize) -> bool {
    if len_a == 0 || len_b == 0 {
        return false;
    }
    let size = std::mem::size_of::<f64>();
    let (a, b) = (a as usize, b as usize);
    a < b.saturating_add(len_b * size) && b < a.saturating_add(len_a * size)
}

/// Coordinates and matches of one nearest-neighbor call, computed on
/// private copies of the caller's degree buffers.
struct NearestOutcome {
    source: PointSet,
    targets: PointSet,
    matches: Vec<Option<Match>>,
}

/// Runs the whole search without touching any caller buffer.
///
/// # Safety
/// Non-null pointers must be valid for reads of their stated length.
unsafe fn nearest_outcome(
    sou_lat: *const f64,
    sou_lon: *const f64,
    n_sou: usize,
    tar_lat: *const f64,
    tar_lon: *const f64,
    n_tar: usize,
    max_r: f64,
) -> Result<NearestOutcome> {
    let resampler = Resampler::new()?;
    // Radius problems are reported before any coordinate is read.
    let layout = resampler.layout(max_r)?;

    let (s_lat, s_lon) = unsafe { (input("sou_lat", sou_lat, n_sou)?, input("sou_lon", sou_lon, n_sou)?) };
    let (t_lat, t_lon) = unsafe { (input("tar_lat", tar_lat, n_tar)?, input("tar_lon", tar_lon, n_tar)?) };
    let source = PointSet::from_degrees(s_lat, s_lon)?;
    let targets = PointSet::from_degrees(t_lat, t_lon)?;

    let index = BandIndex::build(&source, &layout)?;
    let matches = resampler.search(&index, &targets, max_r)?;
    Ok(NearestOutcome {
        source,
        targets,
        matches,
    })
}

/// Overwrites a caller's degree buffers with the radians of `points`.
///
/// # Safety
/// Non-null pointers must be valid for writes of `points.len()` elements.
unsafe fn store_radians(points: &PointSet, lat: *mut f64, lon: *mut f64) -> Result<()> {
    unsafe { output("latitudes", lat, points.len())? }.copy_from_slice(points.lat());
    unsafe { output("longitudes", lon, points.len())? }.copy_from_slice(points.lon());
    Ok(())
}

/// Finds, for every target point, the nearest source point within `max_r`
/// meters.
///
/// Coordinates are in degrees. With `convert_in_place` non-zero the four
/// coordinate buffers hold radians afterwards; they must then not overlap.
/// `tar_nn_dis` may be null when distances are not wanted.
///
/// # Safety
/// Every non-null pointer must be valid for its stated length: `n_sou` for
/// the source buffers, `n_tar` for the target and output buffers.
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn swathgrid_nearest_neighbor(
    sou_lat: *mut f64,
    sou_lon: *mut f64,
    n_sou: c_int,
    tar_lat: *mut f64,
    tar_lon: *mut f64,
    tar_nn_sou_id: *mut c_int,
    tar_nn_dis: *mut f64,
    n_tar: c_int,
    max_r: f64,
    convert_in_place: c_int,
) -> c_int {
    run("swathgrid_nearest_neighbor", || {
        let n_sou = count("n_sou", n_sou)?;
        let n_tar = count("n_tar", n_tar)?;
        if n_tar > 0 && tar_nn_sou_id.is_null() {
            return Err(SwathgridError::InvalidInput("tar_nn_sou_id is null".to_string()));
        }
        let in_place = convert_in_place != 0;

        if in_place {
            let buffers = [
                (sou_lat.cast_const(), n_sou),
                (sou_lon.cast_const(), n_sou),
                (tar_lat.cast_const(), n_tar),
                (tar_lon.cast_const(), n_tar),
            ];
            if buffers.iter().any(|&(p, len)| len > 0 && p.is_null()) {
                return Err(SwathgridError::InvalidInput(
                    "coordinate buffer is null".to_string(),
                ));
            }
            for (i, &(a, len_a)) in buffers.iter().enumerate() {
                for &(b, len_b) in &buffers[i + 1..] {
                    if overlaps(a, b, len_a, len_b) {
                        return Err(SwathgridError::InvalidInput(
                            "coordinate buffers overlap; in-place conversion would convert them twice"
                                .to_string(),
                        ));
                    }
                }
            }
        }

        let outcome = unsafe {
            nearest_outcome(
                sou_lat.cast_const(),
                sou_lon.cast_const(),
                n_sou,
                tar_lat.cast_const(),
                tar_lon.cast_const(),
                n_tar,
                max_r,
            )?
        };
        let matches = &outcome.matches;

        let ids = unsafe { output("tar_nn_sou_id", tar_nn_sou_id, n_tar)? };
        if tar_nn_dis.is_null() {
            for (slot, m) in ids.iter_mut().zip(matches) {
                *slot = Match::encode(m.as_ref()).0;
            }
        } else {
            let dis = unsafe { output("tar_nn_dis", tar_nn_dis, n_tar)? };
            for ((id_slot, dis_slot), m) in ids.iter_mut().zip(dis.iter_mut()).zip(matches) {
                (*id_slot, *dis_slot) = Match::encode(m.as_ref());
            }
        }

        if in_place {
            unsafe {
                store_radians(&outcome.source, sou_lat, sou_lon)?;
                store_radians(&outcome.targets, tar_lat, tar_lon)?;
            }
        }
        Ok(())
    })
}

/// Copies `sou_val[tar_nn_sou_id[i]]` into `tar_val[i]`, writing `-999`
/// where the ID is negative.
///
/// # Safety
/// Every non-null pointer must be valid for its stated length.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swathgrid_nn_interpolate(
    sou_val: *const f64,
    n_sou: c_int,
    tar_val: *mut f64,
    tar_nn_sou_id: *const c_int,
    n_tar: c_int,
) -> c_int {
    run("swathgrid_nn_interpolate", || {
        let n_sou = count("n_sou", n_sou)?;
        let n_tar = count("n_tar", n_tar)?;
        let values = unsafe { input("sou_val", sou_val, n_sou)? };
        let raw_ids = unsafe { input("tar_nn_sou_id", tar_nn_sou_id, n_tar)? };

        let mut ids = Vec::new();
        ids.try_reserve_exact(n_tar)
            .map_err(|e| SwathgridError::allocation::<Option<usize>>("source ids", n_tar, e))?;
        ids.extend(raw_ids.iter().map(|&id| Match::decode_id(id)));

        let copied = transfer::nearest_copy(values, &ids)?;

        let out = unsafe { output("tar_val", tar_val, n_tar)? };
        for (slot, v) in out.iter_mut().zip(copied) {
            *slot = swathgrid_types::sentinel::value_or_no_data(v);
        }
        Ok(())
    })
}

/// Aggregates source values into the target cells they were matched to.
///
/// `sou_nn_tar_id[i]` is the target cell of `sou_val[i]` (negative when
/// unmatched). Writes the mean into `tar_val` and, when the pointers are
/// non-null, the population standard deviation into `tar_sd` and the
/// contributor count into `n_sou_pixels`. Cells without contributors get
/// `-999` mean and deviation and a count of `0`. Source values equal to
/// `-999` are skipped.
///
/// # Safety
/// Every non-null pointer must be valid for its stated length: `n_sou` for
/// the source buffers, `n_tar` for the outputs.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swathgrid_summary_interpolate(
    sou_val: *const f64,
    sou_nn_tar_id: *const c_int,
    n_sou: c_int,
    tar_val: *mut f64,
    tar_sd: *mut f64,
    n_sou_pixels: *mut c_int,
    n_tar: c_int,
) -> c_int {
    run("swathgrid_summary_interpolate", || {
        let n_sou = count("n_sou", n_sou)?;
        let n_tar = count("n_tar", n_tar)?;
        let values = unsafe { input("sou_val", sou_val, n_sou)? };
        let raw_ids = unsafe { input("sou_nn_tar_id", sou_nn_tar_id, n_sou)? };

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(n_sou)
            .map_err(|e| SwathgridError::allocation::<Option<usize>>("target ids", n_sou, e))?;
        cells.extend(raw_ids.iter().map(|&id| Match::decode_id(id)));

        let resampler = Resampler::new()?;
        let summaries =
            transfer::summarize(values, &cells, n_tar, resampler.config().value_filter)?;

        let means = unsafe { output("tar_val", tar_val, n_tar)? };
        for (slot, s) in means.iter_mut().zip(&summaries) {
            *slot = s.mean_or_no_data();
        }
        if !tar_sd.is_null() {
            let sds = unsafe { output("tar_sd", tar_sd, n_tar)? };
            for (slot, s) in sds.iter_mut().zip(&summaries) {
                *slot = s.std_dev_or_no_data();
            }
        }
        if !n_sou_pixels.is_null() {
            let counts = unsafe { output("n_sou_pixels", n_sou_pixels, n_tar)? };
            for (slot, s) in counts.iter_mut().zip(&summaries) {
                // Bounded by n_sou, which came in as a c_int.
                *slot = s.count as c_int;
            }
        }
        Ok(())
    })
}

/// Sets `val[i]` to `-999` wherever `mask[i]` is `-999`.
///
/// # Safety
/// `val` and `mask` must be valid for `n` elements and must not overlap.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swathgrid_clipping(val: *mut f64, mask: *const f64, n: c_int) -> c_int {
    run("swathgrid_clipping", || {
        let n = count("n", n)?;
        if n > 0 && (val.is_null() || mask.is_null()) {
            return Err(SwathgridError::InvalidInput("val or mask is null".to_string()));
        }
        if val.cast_const() == mask {
            // Masking a buffer with itself cannot change it.
            return Ok(());
        }
        if overlaps(val.cast_const(), mask, n, n) {
            return Err(SwathgridError::InvalidInput(
                "val and mask partially overlap".to_string(),
            ));
        }
        let mask = unsafe { input("mask", mask, n)? };
        let values = unsafe { output("val", val, n)? };
        clip::clip_to_mask(values, mask)?;
        Ok(())
    })
}

/// Stores a pointer to the last error message of this thread in
/// `message_out`, or null when the last call succeeded. The string stays
/// valid until the next swathgrid call on the same thread.
///
/// # Safety
/// `message_out` must be a valid pointer to receive the error message pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn swathgrid_last_error_message(message_out: *mut *const c_char) -> c_int {
    if message_out.is_null() {
        return SWATHGRID_ERR_INVALID_ARGUMENT;
    }
    let message = LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(ptr::null(), |m| m.as_ptr())
    });
    unsafe {
        *message_out = message;
    }
    SWATHGRID_OK
}
