//! Global intensity range and linear rescaling.

use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Tensor};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StkError};

/// Target range for rescaled samples, `lo < hi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputRange {
    pub lo: f32,
    pub hi: f32,
}

impl OutputRange {
    /// Create an output range; `lo` must be strictly below `hi`.
    pub fn new(lo: f32, hi: f32) -> Result<Self> {
        let range = Self { lo, hi };
        range.validate()?;
        Ok(range)
    }

    /// Check that both bounds are finite and ordered.
    pub fn validate(&self) -> Result<()> {
        if !(self.lo.is_finite() && self.hi.is_finite() && self.lo < self.hi) {
            return Err(StkError::invalid_configuration(format!(
                "output range must satisfy lo < hi, got [{}, {}]",
                self.lo, self.hi
            )));
        }
        Ok(())
    }

    /// Width of the range.
    pub fn width(&self) -> f32 {
        self.hi - self.lo
    }

    /// Clamp every value of `tensor` into the range.
    pub fn clamp<B: Backend, const D: usize>(&self, tensor: Tensor<B, D>) -> Tensor<B, D> {
        tensor.clamp(self.lo, self.hi)
    }
}

impl Default for OutputRange {
    /// The 8-bit display range `[0, 255]`.
    fn default() -> Self {
        Self { lo: 0.0, hi: 255.0 }
    }
}

/// Minimum and maximum over every valid (non-NaN) sample of a volume.
///
/// Computed once from the original volume and reused for every slice, so
/// rescaling and its inverse are consistent across the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityRange {
    pub min: f32,
    pub max: f32,
}

impl IntensityRange {
    /// Compute the range of `tensor` over its finite samples.
    ///
    /// NaN and infinite samples are missing values and ignored. Fails with
    /// `DegenerateRange` when every valid sample is identical, when no valid
    /// sample exists, or when the range is not finite.
    pub fn compute<B: Backend, const D: usize>(tensor: &Tensor<B, D>) -> Result<Self> {
        let min = fill_invalid(tensor.clone(), f32::INFINITY)
            .min()
            .into_scalar()
            .elem::<f32>();
        let max = fill_invalid(tensor.clone(), f32::NEG_INFINITY)
            .max()
            .into_scalar()
            .elem::<f32>();

        let width = max - min;
        if !(width.is_finite() && width > 0.0) {
            return Err(StkError::DegenerateRange { min, max });
        }

        tracing::debug!("Intensity range [{}, {}]", min, max);
        Ok(Self { min, max })
    }

    /// Width of the range; always positive for a computed range.
    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    /// Map `[min, max]` linearly onto `output`.
    pub fn rescale<B: Backend, const D: usize>(
        &self,
        tensor: Tensor<B, D>,
        output: &OutputRange,
    ) -> Tensor<B, D> {
        let factor = output.width() / self.width();
        tensor
            .sub_scalar(self.min)
            .mul_scalar(factor)
            .add_scalar(output.lo)
    }

    /// Map `output` linearly back onto `[min, max]`.
    pub fn inverse_rescale<B: Backend, const D: usize>(
        &self,
        tensor: Tensor<B, D>,
        output: &OutputRange,
    ) -> Tensor<B, D> {
        let factor = self.width() / output.width();
        tensor
            .sub_scalar(output.lo)
            .mul_scalar(factor)
            .add_scalar(self.min)
    }
}

/// Replace NaN and infinite samples with `value`.
pub fn fill_invalid<B: Backend, const D: usize>(tensor: Tensor<B, D>, value: f32) -> Tensor<B, D> {
    let nan = tensor.clone().is_nan();
    let tensor = tensor.mask_fill(nan, value);
    let infinite = tensor.clone().abs().equal_elem(f32::INFINITY);
    tensor.mask_fill(infinite, value)
}
