//! Compute layer: geometry, indexing, search and value transfer.
//!
//! Everything here works on radians and `Option`s. Sentinel encoding and
//! degree conversion happen at the edges (`points`, `ffi`).

pub mod clip;
pub mod geometry;
pub mod index;
pub mod search;
pub mod transfer;
pub mod validation;
