//! The main entry point: index, match and transfer values between swaths.

use crate::compute::geometry::meters_to_radians;
use crate::compute::index::{BandIndex, BandLayout};
use crate::compute::search::NearestSearch;
use crate::compute::transfer;
use crate::compute::validation::{validate_len, validate_radius};
use crate::config::Config;
use crate::error::{Result, SwathgridError};
use crate::points::PointSet;
use rayon::{ThreadPool, ThreadPoolBuilder};
use swathgrid_types::matching::Match;
use swathgrid_types::summary::CellSummary;

/// Resamples values between two point sets by bounded nearest-neighbor
/// matching.
///
/// A `Resampler` holds no per-call state; the same instance can serve any
/// number of calls, from any number of threads.
///
/// # Examples
///
/// ```
/// use swathgrid::{PointSet, Resampler};
///
/// let resampler = Resampler::new()?;
/// let source = PointSet::from_degrees(&[0.0], &[0.0])?;
/// let target = PointSet::from_degrees(&[0.0, 40.0], &[0.0001, 0.0])?;
///
/// let matches = resampler.nearest_neighbor(&source, &target, 50_000.0)?;
/// assert_eq!(matches[0].map(|m| m.id), Some(0));
/// assert!(matches[1].is_none());
/// # Ok::<(), swathgrid::SwathgridError>(())
/// ```
#[derive(Debug)]
pub struct Resampler {
    config: Config,
    pool: Option<ThreadPool>,
}

impl Resampler {
    /// Creates a resampler with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Creates a resampler, spawning a dedicated thread pool when
    /// `config.threads` is non-zero.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(SwathgridError::Config)?;

        let pool = if config.threads > 0 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(config.threads)
                    .thread_name(|i| format!("swathgrid-{}", i))
                    .build()?,
            )
        } else {
            None
        };

        log::debug!(
            "Resampler ready: {} threads, {:?}, {:?}",
            config.threads,
            config.distance_formula,
            config.value_filter
        );

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn install<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Band layout used for indexes searched with `radius_m`.
    pub fn layout(&self, radius_m: f64) -> Result<BandLayout> {
        BandLayout::for_radius(radius_m, &self.config)
    }

    /// Buckets `source` for searches of up to `radius_m` meters.
    pub fn build_index(&self, source: &PointSet, radius_m: f64) -> Result<BandIndex> {
        let layout = self.layout(radius_m)?;
        BandIndex::build(source, &layout)
    }

    /// Searches an existing index for the nearest point to every target.
    ///
    /// `radius_m` may not exceed the radius the index was built for.
    pub fn search(
        &self,
        index: &BandIndex,
        targets: &PointSet,
        radius_m: f64,
    ) -> Result<Vec<Option<Match>>> {
        validate_radius(radius_m)?;
        let max_angle = meters_to_radians(radius_m, self.config.earth_radius_m);
        if max_angle > index.block_angle() {
            return Err(SwathgridError::InvalidInput(format!(
                "Radius of {} m is wider than the index blocks ({} m)",
                radius_m,
                index.block_angle() * self.config.earth_radius_m
            )));
        }

        let search = NearestSearch::new(index, max_angle, self.config.distance_formula);
        let matches = self.install(|| search.search_all(targets, self.config.earth_radius_m))?;

        log::debug!(
            "Matched {} of {} targets within {} m",
            matches.iter().filter(|m| m.is_some()).count(),
            targets.len(),
            radius_m
        );
        Ok(matches)
    }

    /// Nearest `source` point within `radius_m` meters of each target.
    pub fn nearest_neighbor(
        &self,
        source: &PointSet,
        targets: &PointSet,
        radius_m: f64,
    ) -> Result<Vec<Option<Match>>> {
        let index = self.build_index(source, radius_m)?;
        self.search(&index, targets, radius_m)
    }

    /// Copies `values[match.id]` into each target; unmatched targets get `None`.
    pub fn interpolate_nearest(
        &self,
        values: &[f64],
        matches: &[Option<Match>],
    ) -> Result<Vec<Option<f64>>> {
        let ids = transfer::match_ids(matches)?;
        self.install(|| transfer::nearest_copy(values, &ids))
    }

    /// Aggregates source values into target cells.
    ///
    /// `matches[i]` is the target cell source value `values[i]` was matched
    /// to, as produced by searching the target set with the sources as
    /// queries. Which values contribute is decided by
    /// [`Config::value_filter`].
    pub fn summarize(
        &self,
        values: &[f64],
        matches: &[Option<Match>],
        n_targets: usize,
    ) -> Result<Vec<CellSummary>> {
        let cells = transfer::match_ids(matches)?;
        transfer::summarize(values, &cells, n_targets, self.config.value_filter)
    }

    /// One-to-one resampling: each target takes the value of its nearest
    /// source within `radius_m`.
    pub fn resample_nearest(
        &self,
        source: &PointSet,
        values: &[f64],
        targets: &PointSet,
        radius_m: f64,
    ) -> Result<Vec<Option<f64>>> {
        validate_len("source values", source.len(), values.len())?;
        let matches = self.nearest_neighbor(source, targets, radius_m)?;
        self.interpolate_nearest(values, &matches)
    }

    /// Many-to-one resampling: every source contributes to the target it is
    /// nearest to, and each target reports mean, deviation and count.
    pub fn resample_summary(
        &self,
        source: &PointSet,
        values: &[f64],
        targets: &PointSet,
        radius_m: f64,
    ) -> Result<Vec<CellSummary>> {
        validate_len("source values", source.len(), values.len())?;
        let matches = self.nearest_neighbor(targets, source, radius_m)?;
        self.summarize(values, &matches, targets.len())
    }
}
