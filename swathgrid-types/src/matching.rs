use crate::sentinel::{NO_MATCH_DISTANCE, NO_MATCH_ID};
use serde::{Deserialize, Serialize};

/// The nearest indexed point found for one query point.
///
/// `id` is the position of that point in the set the index was built from,
/// not its position inside the bucketed index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Original ID of the nearest indexed point
    pub id: usize,
    /// Great-circle distance in meters
    pub distance_m: f64,
}

impl Match {
    pub fn new(id: usize, distance_m: f64) -> Self {
        Self { id, distance_m }
    }

    /// Encodes an optional match as the `(id, distance)` pair written to
    /// caller buffers, using `-1` for both fields when absent.
    ///
    /// IDs larger than `i32::MAX` cannot be represented at the boundary;
    /// callers are expected to reject such inputs before searching.
    pub fn encode(m: Option<&Match>) -> (i32, f64) {
        match m {
            Some(m) => (m.id as i32, m.distance_m),
            None => (NO_MATCH_ID, NO_MATCH_DISTANCE),
        }
    }

    /// Decodes a boundary ID, treating every negative value as "no match".
    pub fn decode_id(id: i32) -> Option<usize> {
        usize::try_from(id).ok()
    }
}
