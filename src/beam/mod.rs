//! Beam reinforcement reconstruction.
//!
//! Overview
//! - [`center`] estimates the vertical midline of a beam from its longest
//!   horizontal edges; every bar is classified top/bottom against it.
//! - [`bars`] pairs canonical horizontal segments with vertical hooks at
//!   their endpoints, filters implausible pairings, classifies the survivors
//!   and merges collinear runs into single bars.

pub mod bars;
pub mod center;

pub use bars::{reconstruct_bars, BarClass, BarOptions, RebarBar};
pub use center::{center_height, CenterOptions};
