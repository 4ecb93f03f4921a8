//! Error types for volume loading and slice denoising.
//!
//! Every fallible operation in the workspace reports one of these kinds.
//! None of them are retried; a failure aborts the whole invocation.

use std::path::PathBuf;
use thiserror::Error;

/// Error raised by an opaque denoising model, preserved unchanged.
pub type ModelError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for volume and pipeline operations.
#[derive(Error, Debug)]
pub enum StkError {
    /// Sample count or tensor shape does not match what was required.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Global minimum equals global maximum (or no valid samples exist).
    #[error("Degenerate intensity range: min {min}, max {max}")]
    DegenerateRange { min: f32, max: f32 },

    /// Source missing, unreadable or malformed.
    #[error("I/O error on {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Non-numeric payload in a data column.
    #[error("Data format error in {} column '{column}': {message}", path.display())]
    DataFormat {
        path: PathBuf,
        column: String,
        message: String,
    },

    /// The model raised or returned an array of the wrong shape.
    #[error("Model invocation failed on slice {slice}: {source}")]
    ModelInvocation {
        slice: usize,
        #[source]
        source: ModelError,
    },

    /// Axis outside `0..3`.
    #[error("Invalid axis {0}: expected 0, 1 or 2")]
    InvalidAxis(usize),

    /// Slice index outside the axis length.
    #[error("Index {index} out of bounds for axis {axis} with length {len}")]
    IndexOutOfBounds { axis: usize, index: usize, len: usize },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Run stopped through its cancellation token.
    #[error("Cancelled after {completed} slices")]
    Cancelled { completed: usize },
}

/// Result type for volume and pipeline operations.
pub type Result<T> = std::result::Result<T, StkError>;

impl StkError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        Self::Io {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    /// Create a data format error for `column` of `path`.
    pub fn data_format(
        path: impl Into<PathBuf>,
        column: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::DataFormat {
            path: path.into(),
            column: column.into(),
            message: msg.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Wrap a model failure for `slice`.
    pub fn model_invocation(slice: usize, source: impl Into<ModelError>) -> Self {
        Self::ModelInvocation {
            slice,
            source: source.into(),
        }
    }
}
