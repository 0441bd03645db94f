//! # swathgrid-types
//!
//! Plain data types shared between the `swathgrid` resampling kernel and the
//! flat-buffer boundary that hosts call into:
//!
//! - **Sentinels**: the numeric markers used at the buffer boundary
//!   (`NO_MATCH_ID`, `NO_MATCH_DISTANCE`, `NO_DATA`)
//! - **Match results**: [`matching::Match`] for one nearest-neighbor hit
//! - **Summaries**: [`summary::CellSummary`] for many-to-one aggregation
//! - **Options**: [`options::DistanceFormula`] and [`options::ValueFilter`]
//!
//! All types are serializable with Serde.
//!
//! ## Examples
//!
//! ```rust
//! use swathgrid_types::matching::Match;
//! use swathgrid_types::sentinel::{NO_MATCH_DISTANCE, NO_MATCH_ID};
//!
//! let hit = Some(Match::new(7, 11.1));
//! assert_eq!(Match::encode(hit.as_ref()), (7, 11.1));
//! assert_eq!(Match::encode(None), (NO_MATCH_ID, NO_MATCH_DISTANCE));
//! ```

pub mod matching;
pub mod options;
pub mod sentinel;
pub mod summary;
