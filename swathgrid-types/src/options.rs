use serde::{Deserialize, Serialize};

/// Formula used for great-circle angular distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceFormula {
    /// Spherical law of cosines.
    #[default]
    SphericalCosines,
    /// Haversine form, better conditioned for near-coincident points.
    Haversine,
}

/// Rule deciding which source values contribute to a cell summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueFilter {
    /// Skip values equal to the no-data marker (and NaN).
    #[default]
    NoData,
    /// Skip every negative value (and NaN). Radiances are never negative,
    /// so older products used this to drop all fill values at once.
    NonNegative,
}

impl ValueFilter {
    /// Returns true when `value` should be accumulated.
    #[inline]
    pub fn accepts(self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        match self {
            ValueFilter::NoData => !crate::sentinel::is_no_data(value),
            ValueFilter::NonNegative => value >= 0.0,
        }
    }
}
