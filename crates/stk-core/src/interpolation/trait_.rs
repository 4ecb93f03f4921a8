//! Interpolator trait for sampling slice values at continuous coordinates.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;

/// Interpolator trait for sampling values at continuous coordinates.
///
/// # Type Parameters
/// * `B` - The Burn backend
pub trait Interpolator<B: Backend>: Send + Sync {
    /// Interpolate values from a 2D slice at given continuous indices.
    ///
    /// # Arguments
    /// * `data` - The source slice `[H, W]`
    /// * `indices` - The indices at which to interpolate `[Batch, 2]`, columns `(x, y)`
    ///   where `x` runs along W and `y` along H. Out-of-range indices clamp to the border.
    ///
    /// # Returns
    /// Tensor of sampled values `[Batch]`
    fn interpolate(&self, data: &Tensor<B, 2>, indices: Tensor<B, 2>) -> Tensor<B, 1>;
}
