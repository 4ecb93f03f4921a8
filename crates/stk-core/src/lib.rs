pub mod error;
pub mod volume;
pub mod interpolation;
pub mod filter;

pub use error::{ModelError, Result, StkError};
pub use volume::{IntensityRange, OutputRange, Volume};
pub use interpolation::InterpolationPolicy;
