//! Moving values between point sets once matches are known.

use crate::compute::validation::{validate_ids, validate_len};
use crate::config::ValueFilter;
use crate::error::{Result, SwathgridError, try_filled_vec};
use rayon::prelude::*;
use swathgrid_types::matching::Match;
use swathgrid_types::summary::CellSummary;

/// Copies the matched source value into every target.
///
/// `ids` holds one source ID per target; unmatched targets get `None`.
/// IDs pointing past the end of `values` are rejected up front.
pub fn nearest_copy(values: &[f64], ids: &[Option<usize>]) -> Result<Vec<Option<f64>>> {
    validate_ids("source id", ids.iter().copied(), values.len())?;

    let mut out = Vec::new();
    out.try_reserve_exact(ids.len())
        .map_err(|e| SwathgridError::allocation::<Option<f64>>("target values", ids.len(), e))?;
    out.par_extend(ids.par_iter().map(|id| id.map(|id| values[id])));
    Ok(out)
}

/// Source IDs of a match list, in order.
pub fn match_ids(matches: &[Option<Match>]) -> Result<Vec<Option<usize>>> {
    let mut ids = Vec::new();
    ids.try_reserve_exact(matches.len())
        .map_err(|e| SwathgridError::allocation::<Option<usize>>("match ids", matches.len(), e))?;
    ids.extend(matches.iter().map(|m| m.map(|m| m.id)));
    Ok(ids)
}

/// Aggregates source values into the target cells they were matched to.
///
/// `cells[i]` is the target cell of source value `values[i]`. Values the
/// filter rejects are skipped entirely, so they count toward neither the
/// moments nor the contributor count.
pub fn summarize(
    values: &[f64],
    cells: &[Option<usize>],
    n_cells: usize,
    filter: ValueFilter,
) -> Result<Vec<CellSummary>> {
    validate_len("source cell ids", values.len(), cells.len())?;
    validate_ids("target cell id", cells.iter().copied(), n_cells)?;

    let mut count = try_filled_vec("cell counts", n_cells, 0usize)?;
    let mut sum = try_filled_vec("cell sums", n_cells, 0.0f64)?;
    let mut sum_sq = try_filled_vec("cell squared sums", n_cells, 0.0f64)?;

    let mut skipped = 0usize;
    for (&value, cell) in values.iter().zip(cells) {
        let Some(cell) = *cell else { continue };
        if !filter.accepts(value) {
            skipped += 1;
            continue;
        }
        count[cell] += 1;
        sum[cell] += value;
        sum_sq[cell] += value * value;
    }

    if skipped > 0 {
        log::debug!("{} matched source values excluded by {:?}", skipped, filter);
    }

    let mut out = Vec::new();
    out.try_reserve_exact(n_cells)
        .map_err(|e| SwathgridError::allocation::<CellSummary>("cell summaries", n_cells, e))?;
    out.extend(
        (0..n_cells).map(|c| CellSummary::from_moments(count[c], sum[c], sum_sq[c])),
    );
    Ok(out)
}
