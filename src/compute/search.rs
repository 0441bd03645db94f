//! Bounded nearest-neighbor search over a [`BandIndex`].
//!
//! A query looks at its own band and the bands directly above and below.
//! Single-block bands are scanned whole; otherwise only the query's block
//! and its two horizontal neighbors are scanned, wrapping across the
//! antimeridian. Because blocks are at least one search radius wide and
//! bands one radius tall, any point within the radius lies in that window.

use crate::compute::geometry::{angular_distance, lat_from_south, radians_to_meters};
use crate::compute::index::{BandIndex, LatBand};
use crate::config::DistanceFormula;
use crate::error::{Result, SwathgridError};
use crate::points::PointSet;
use rayon::prelude::*;
use std::ops::Range;
use swathgrid_types::matching::Match;

/// Closest point seen so far during one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Original ID of the indexed point
    pub id: usize,
    /// Angular distance in radians
    pub angle: f64,
}

/// Query parameters bound to one index.
#[derive(Debug, Clone, Copy)]
pub struct NearestSearch<'a> {
    index: &'a BandIndex,
    max_angle: f64,
    formula: DistanceFormula,
}

impl<'a> NearestSearch<'a> {
    /// `max_angle` is the search radius in radians; candidates farther than
    /// that are ignored even when they lie inside the scanned blocks.
    pub fn new(index: &'a BandIndex, max_angle: f64, formula: DistanceFormula) -> Self {
        Self {
            index,
            max_angle,
            formula,
        }
    }

    /// Nearest indexed point within the radius of (`lat`, `lon`) radians.
    ///
    /// When several points are equally close the first one scanned wins:
    /// bands south to north, blocks west to east starting one block west of
    /// the query, points in their original order within a block.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<Candidate> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        let row = (lat_from_south(lat) / self.index.band_height()).trunc();
        if row < -1.0 || row > self.index.band_count() as f64 {
            return None;
        }
        let row = row as i64;

        let mut best = None;
        for j in (row - 1)..=(row + 1) {
            let Some(band) = usize::try_from(j).ok().and_then(|j| self.index.band(j)) else {
                continue;
            };

            if band.block_count() == 1 {
                self.scan(self.index.span(band, 0, 1), lat, lon, &mut best);
            } else {
                self.scan_window(band, lat, lon, &mut best);
            }
        }
        best
    }

    fn scan_window(&self, band: &LatBand, lat: f64, lon: f64, best: &mut Option<Candidate>) {
        let center = band.window_center(lon);
        for col in (center - 1)..=(center + 1) {
            let block = band.wrap_block(col);
            self.scan(self.index.span(band, block, block + 1), lat, lon, best);
        }
    }

    #[inline]
    fn scan(&self, range: Range<usize>, lat: f64, lon: f64, best: &mut Option<Candidate>) {
        for pos in range {
            let (s_lat, s_lon, id) = self.index.entry(pos);
            let angle = angular_distance(self.formula, lat, lon, s_lat, s_lon);

            if angle <= self.max_angle && best.is_none_or(|b| angle < b.angle) {
                *best = Some(Candidate { id, angle });
            }
        }
    }

    /// Runs [`NearestSearch::nearest`] for every target point in parallel.
    ///
    /// Runs on whichever rayon pool the caller is installed in. The output
    /// has one entry per target, in target order.
    pub fn search_all(&self, targets: &PointSet, earth_radius_m: f64) -> Result<Vec<Option<Match>>> {
        let mut out = Vec::new();
        out.try_reserve_exact(targets.len())
            .map_err(|e| SwathgridError::allocation::<Option<Match>>("matches", targets.len(), e))?;

        out.par_extend(
            targets
                .lat()
                .par_iter()
                .zip(targets.lon().par_iter())
                .map(|(&lat, &lon)| {
                    self.nearest(lat, lon)
                        .map(|c| Match::new(c.id, radians_to_meters(c.angle, earth_radius_m)))
                }),
        );

        Ok(out)
    }
}
