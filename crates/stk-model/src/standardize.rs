//! Standardization applied around model inference.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};
use stk_core::{Result, StkError};

/// Model input resolution `[rows, cols]` of the pretrained denoiser.
pub const REFERENCE_RESOLUTION: [usize; 2] = [400, 160];

/// Linear mapping `(x - mean) / scale` and its inverse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standardization {
    pub mean: f32,
    pub scale: f32,
}

impl Default for Standardization {
    /// Statistics the pretrained denoiser was trained with on `[0, 255]` input.
    fn default() -> Self {
        Self {
            mean: 128.0,
            scale: 43.0,
        }
    }
}

impl Standardization {
    /// Create a standardization; `scale` must be finite and non-zero.
    pub fn new(mean: f32, scale: f32) -> Result<Self> {
        let standardization = Self { mean, scale };
        standardization.validate()?;
        Ok(standardization)
    }

    /// Check the parameters.
    pub fn validate(&self) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(StkError::invalid_configuration(format!(
                "standardize mean must be finite, got {}",
                self.mean
            )));
        }
        if !self.scale.is_finite() || self.scale == 0.0 {
            return Err(StkError::invalid_configuration(format!(
                "standardize scale must be finite and non-zero, got {}",
                self.scale
            )));
        }
        Ok(())
    }

    /// `(x - mean) / scale`
    pub fn apply<B: Backend, const D: usize>(&self, tensor: Tensor<B, D>) -> Tensor<B, D> {
        tensor.sub_scalar(self.mean).div_scalar(self.scale)
    }

    /// `x * scale + mean`
    pub fn invert<B: Backend, const D: usize>(&self, tensor: Tensor<B, D>) -> Tensor<B, D> {
        tensor.mul_scalar(self.scale).add_scalar(self.mean)
    }
}
