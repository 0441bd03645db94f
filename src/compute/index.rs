//! Latitude-banded, longitude-blocked bucket index.
//!
//! The sphere is cut into `n` latitude bands of equal height. Each band is
//! cut into longitude blocks whose width is chosen so that a block is never
//! narrower (in meters) than the band is tall, which is what lets a search
//! look only at the 3×3 neighborhood of blocks around a query point.
//!
//! Points are bucket-sorted into one flat array in band-then-block order
//! (counting sort). Block boundaries live in a single offsets arena; band
//! `i` sees its `blocks + 1` cumulative offsets as one slice of it.

use crate::compute::geometry::{lat_from_south, lon_from_antimeridian, meters_to_radians};
use crate::compute::validation::validate_radius;
use crate::config::Config;
use crate::error::{Result, SwathgridError, try_filled_vec};
use crate::points::PointSet;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::ops::Range;

/// Offset arenas above this many entries are logged as unusually large.
const LARGE_LAYOUT_ENTRIES: usize = 64 * 1024 * 1024;

/// Band count and block size an index is built with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandLayout {
    n_bands: usize,
    block_angle: f64,
}

impl BandLayout {
    /// Creates a layout with `n_bands` bands and blocks sized for
    /// `block_angle` radians.
    pub fn new(n_bands: usize, block_angle: f64) -> Result<Self> {
        if n_bands == 0 {
            return Err(SwathgridError::InvalidInput(
                "Band count must be at least 1".to_string(),
            ));
        }
        if !block_angle.is_finite() || block_angle <= 0.0 {
            return Err(SwathgridError::InvalidInput(format!(
                "Block angle must be positive and finite, got: {}",
                block_angle
            )));
        }
        Ok(Self {
            n_bands,
            block_angle,
        })
    }

    /// Derives the layout for a search radius.
    ///
    /// Blocks are sized to the radius, but never below
    /// `config.min_block_size_m`; the band count is however many blocks fit
    /// pole to pole, at least one.
    pub fn for_radius(radius_m: f64, config: &Config) -> Result<Self> {
        validate_radius(radius_m)?;

        let block_m = if radius_m < config.min_block_size_m {
            config.min_block_size_m
        } else {
            radius_m
        };
        let block_angle = meters_to_radians(block_m, config.earth_radius_m);

        let bands = (PI / block_angle).trunc();
        let n_bands = if bands < 1.0 {
            log::debug!(
                "Radius of {} m spans more than a hemisphere; using a single band",
                radius_m
            );
            1
        } else {
            bands as usize
        };

        Self::new(n_bands, block_angle)
    }

    pub fn band_count(&self) -> usize {
        self.n_bands
    }

    pub fn block_angle(&self) -> f64 {
        self.block_angle
    }

    pub fn band_height(&self) -> f64 {
        PI / self.n_bands as f64
    }

    /// Latitude whose circumference sizes the blocks of band `i`.
    ///
    /// Bands in the southern half use their lower edge and the rest use
    /// their upper edge, so the band straddling the equator is sized from
    /// the lower edge. Block assignments depend on this rule, so it stays
    /// as is; it is a candidate off-by-one.
    fn representative_lat(&self, i: usize) -> f64 {
        let height = self.band_height();
        if i < self.n_bands.div_ceil(2) {
            -FRAC_PI_2 + height * i as f64
        } else {
            -FRAC_PI_2 + height * (i + 1) as f64
        }
    }

    /// Number of longitude blocks in band `i`.
    pub fn blocks_in_band(&self, i: usize) -> usize {
        if i == 0 || i + 1 >= self.n_bands {
            return 1;
        }
        let blocks = (2.0 * PI * self.representative_lat(i).cos() / self.block_angle).trunc();
        if blocks < 4.0 { 1 } else { blocks as usize }
    }
}

/// One latitude band of a [`BandIndex`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatBand {
    block_width: f64,
    n_blocks: usize,
    /// Global number of this band's first block
    offset_base: usize,
}

impl LatBand {
    pub fn block_count(&self) -> usize {
        self.n_blocks
    }

    /// Angular width of every block in this band, in radians.
    pub fn block_width(&self) -> f64 {
        self.block_width
    }

    /// Block containing `lon`, if any.
    #[inline]
    fn column(&self, lon: f64) -> Option<usize> {
        let col = (lon_from_antimeridian(lon) / self.block_width).trunc();
        if col >= 0.0 && col < self.n_blocks as f64 {
            Some(col as usize)
        } else {
            None
        }
    }

    /// Unchecked column of `lon`, clamped to `[-2, blocks + 1]`.
    ///
    /// Clamping keeps integer arithmetic safe without changing which blocks
    /// [`LatBand::wrap_block`] maps the 3-wide window onto.
    #[inline]
    pub(crate) fn window_center(&self, lon: f64) -> i64 {
        let col = (lon_from_antimeridian(lon) / self.block_width).trunc();
        col.clamp(-2.0, self.n_blocks as f64 + 1.0) as i64
    }

    /// Maps a window column onto a real block: anything left of the first
    /// block is the last block, anything right of the last is the first.
    #[inline]
    pub(crate) fn wrap_block(&self, col: i64) -> usize {
        if col < 0 {
            self.n_blocks - 1
        } else if col as usize >= self.n_blocks {
            0
        } else {
            col as usize
        }
    }
}

/// Bucketed spatial index over one point set.
///
/// Built once per source set and only read afterwards, so it can be shared
/// across search threads without locking.
#[derive(Debug, Clone)]
pub struct BandIndex {
    band_height: f64,
    block_angle: f64,
    bands: Vec<LatBand>,
    /// Cumulative positions of every block into the reordered arrays, plus
    /// the final total
    offsets: Vec<u32>,
    lat: Vec<f64>,
    lon: Vec<f64>,
    origin: Vec<u32>,
    dropped: usize,
}

/// (band, block) of the cell containing (`lat`, `lon`).
///
/// The counting and scatter passes both go through here so they can never
/// disagree about where a point belongs.
#[inline]
fn locate(bands: &[LatBand], band_height: f64, lat: f64, lon: f64) -> Option<(usize, usize)> {
    let row = (lat_from_south(lat) / band_height).trunc();
    if !(row >= 0.0 && row < bands.len() as f64) {
        return None;
    }
    let row = row as usize;
    let col = bands[row].column(lon)?;
    Some((row, col))
}

fn plan_bands(layout: &BandLayout) -> Result<(Vec<LatBand>, usize)> {
    let mut bands = Vec::new();
    bands
        .try_reserve_exact(layout.band_count())
        .map_err(|e| SwathgridError::allocation::<LatBand>("bands", layout.band_count(), e))?;

    let mut offset_base = 0usize;
    for i in 0..layout.band_count() {
        let n_blocks = layout.blocks_in_band(i);
        bands.push(LatBand {
            block_width: TAU / n_blocks as f64,
            n_blocks,
            offset_base,
        });
        offset_base = offset_base
            .checked_add(n_blocks)
            .ok_or(SwathgridError::AllocationFailed {
                what: "block offsets",
                bytes: usize::MAX,
            })?;
    }

    Ok((bands, offset_base))
}

impl BandIndex {
    /// Buckets `points` into the bands and blocks of `layout`.
    ///
    /// Points whose band or block falls outside the layout (non-finite
    /// coordinates, fill values, longitudes at exactly +180°) are left out
    /// and counted in [`BandIndex::dropped`]. No query can reach them.
    pub fn build(points: &PointSet, layout: &BandLayout) -> Result<Self> {
        let band_height = layout.band_height();
        let (bands, total_blocks) = plan_bands(layout)?;
        let arena_len = total_blocks + 1;

        if arena_len > LARGE_LAYOUT_ENTRIES {
            log::warn!(
                "Index layout needs {} offset entries across {} bands; consider a larger radius or min_block_size_m",
                arena_len,
                bands.len()
            );
        }

        // Blocks are numbered globally in band-then-block order, so the end
        // of one band's last block is the start of the next band's first.
        let mut offsets = try_filled_vec("block offsets", arena_len, 0u32)?;

        for (lat, lon) in points.iter() {
            if let Some((row, col)) = locate(&bands, band_height, lat, lon) {
                offsets[bands[row].offset_base + col + 1] += 1;
            }
        }
        for slot in 1..arena_len {
            offsets[slot] += offsets[slot - 1];
        }

        let indexed = offsets[total_blocks] as usize;
        let mut new_lat = try_filled_vec("reordered latitudes", indexed, 0.0f64)?;
        let mut new_lon = try_filled_vec("reordered longitudes", indexed, 0.0f64)?;
        let mut origin = try_filled_vec("origin ids", indexed, 0u32)?;

        // offsets[slot] doubles as the write cursor of block `slot`.
        for (id, (lat, lon)) in points.iter().enumerate() {
            if let Some((row, col)) = locate(&bands, band_height, lat, lon) {
                let slot = bands[row].offset_base + col;
                let pos = offsets[slot] as usize;
                new_lat[pos] = lat;
                new_lon[pos] = lon;
                origin[pos] = id as u32;
                offsets[slot] += 1;
            }
        }
        // Every cursor now sits on the start of the following block.
        for slot in (1..arena_len).rev() {
            offsets[slot] = offsets[slot - 1];
        }
        offsets[0] = 0;

        let dropped = points.len() - indexed;
        if dropped > 0 {
            log::warn!(
                "{} of {} points fall outside every band/block and were not indexed",
                dropped,
                points.len()
            );
        }
        log::debug!(
            "Built band index: {} bands, {} blocks, {} points indexed",
            bands.len(),
            total_blocks,
            indexed
        );

        Ok(Self {
            band_height,
            block_angle: layout.block_angle(),
            bands,
            offsets,
            lat: new_lat,
            lon: new_lon,
            origin,
            dropped,
        })
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    pub fn band_height(&self) -> f64 {
        self.band_height
    }

    /// Largest search radius, in radians, this index can answer exactly.
    pub fn block_angle(&self) -> f64 {
        self.block_angle
    }

    pub fn band(&self, row: usize) -> Option<&LatBand> {
        self.bands.get(row)
    }

    pub fn bands(&self) -> &[LatBand] {
        &self.bands
    }

    /// Number of points stored in the index.
    pub fn indexed_len(&self) -> usize {
        self.origin.len()
    }

    /// Number of input points that could not be placed.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// (band, block) an input coordinate belongs to, if any.
    pub fn locate(&self, lat: f64, lon: f64) -> Option<(usize, usize)> {
        locate(&self.bands, self.band_height, lat, lon)
    }

    /// Cumulative offsets of one band (`blocks + 1` entries).
    pub fn band_offsets(&self, row: usize) -> Option<&[u32]> {
        let band = self.bands.get(row)?;
        Some(&self.offsets[band.offset_base..band.offset_base + band.n_blocks + 1])
    }

    /// Positions of all points in band `row`.
    pub fn band_range(&self, row: usize) -> Option<Range<usize>> {
        let band = self.bands.get(row)?;
        Some(self.span(band, 0, band.n_blocks))
    }

    /// Positions of the points in one block.
    pub fn block_range(&self, row: usize, block: usize) -> Option<Range<usize>> {
        let band = self.bands.get(row)?;
        if block >= band.n_blocks {
            return None;
        }
        Some(self.span(band, block, block + 1))
    }

    #[inline]
    pub(crate) fn span(&self, band: &LatBand, first: usize, end: usize) -> Range<usize> {
        self.offsets[band.offset_base + first] as usize..self.offsets[band.offset_base + end] as usize
    }

    /// Stored (lat, lon, original id) at position `pos`.
    #[inline]
    pub fn entry(&self, pos: usize) -> (f64, f64, usize) {
        (self.lat[pos], self.lon[pos], self.origin[pos] as usize)
    }
}
