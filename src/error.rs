//! Error types for swathgrid.

use std::collections::TryReserveError;

/// Errors returned by indexing, search, transfer and configuration.
///
/// "No match" is never an error; it is reported as `None` in results.
#[derive(Debug, thiserror::Error)]
pub enum SwathgridError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to allocate {bytes} bytes for {what}")]
    AllocationFailed { what: &'static str, bytes: usize },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SwathgridError>;

impl SwathgridError {
    pub(crate) fn allocation<T>(what: &'static str, len: usize, _source: TryReserveError) -> Self {
        SwathgridError::AllocationFailed {
            what,
            bytes: len.saturating_mul(std::mem::size_of::<T>()),
        }
    }
}

/// Allocates a zero-filled (default-filled) vector without aborting on
/// allocation failure.
pub(crate) fn try_filled_vec<T: Clone>(what: &'static str, len: usize, value: T) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|e| SwathgridError::allocation::<T>(what, len, e))?;
    v.resize(len, value);
    Ok(v)
}
