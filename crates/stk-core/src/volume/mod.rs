//! Volume types and operations.
//!
//! This module provides the dense 3D Volume, its global intensity range,
//! and the orthogonal slice query used by display sinks.

pub mod volume;
pub mod range;
pub mod orthogonal;

pub use volume::{check_axis, sample_count, tensor_to_vec, Volume};
pub use range::{fill_invalid, IntensityRange, OutputRange};
pub use orthogonal::{LabeledSlice, OrthogonalSlices, SurveyAxis};
