//! Interpolation types and operations.
//!
//! This module provides the 2D interpolation trait and the two sampling
//! policies available to the slice resizer.

pub mod trait_;
pub mod linear;
pub mod nearest;

use serde::{Deserialize, Serialize};

pub use trait_::Interpolator;
pub use linear::LinearInterpolator;
pub use nearest::NearestNeighborInterpolator;

/// Sampling policy used for every resize of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationPolicy {
    /// Bilinear interpolation.
    #[default]
    Bilinear,
    /// Nearest neighbor.
    Nearest,
}
