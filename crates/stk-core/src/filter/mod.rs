//! Slice filters.

pub mod resize;

pub use resize::{resize, ResizeFilter};
