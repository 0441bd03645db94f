use crate::sentinel::value_or_no_data;
use serde::{Deserialize, Serialize};

/// Aggregate of all source values that fell into one target cell.
///
/// `mean` and `std_dev` are `None` exactly when `count` is zero. The
/// deviation is the population form (divides by `count`, not `count - 1`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CellSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

impl CellSummary {
    /// Summary of a cell nothing contributed to.
    pub const EMPTY: CellSummary = CellSummary {
        count: 0,
        mean: None,
        std_dev: None,
    };

    /// Builds a summary from accumulated sum and sum of squares.
    ///
    /// The variance radicand is clamped at zero so round-off on constant
    /// inputs can never produce NaN.
    pub fn from_moments(count: usize, sum: f64, sum_sq: f64) -> Self {
        if count == 0 {
            return Self::EMPTY;
        }
        let n = count as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);
        Self {
            count,
            mean: Some(mean),
            std_dev: Some(variance.sqrt()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean as written to a value buffer (`-999` when empty).
    pub fn mean_or_no_data(&self) -> f64 {
        value_or_no_data(self.mean)
    }

    /// Standard deviation as written to a value buffer (`-999` when empty).
    pub fn std_dev_or_no_data(&self) -> f64 {
        value_or_no_data(self.std_dev)
    }
}
