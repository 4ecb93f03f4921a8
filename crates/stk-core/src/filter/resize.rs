//! Resize filter for 2D slices.
//!
//! Maps an `[H, W]` slice onto an `[H', W']` grid by sampling the input at
//! corner-aligned continuous indices: output row `r` reads input row
//! `r * (H - 1) / (H' - 1)`, and likewise for columns. The first and last
//! rows and columns of input and output coincide, so a resize followed by
//! the inverse resize reproduces data that is linear along rows and columns.
//! Rows stay rows and columns stay columns; the filter never transposes.

use std::marker::PhantomData;
use burn::tensor::{Int, Tensor};
use burn::tensor::backend::Backend;
use crate::interpolation::{InterpolationPolicy, Interpolator, LinearInterpolator, NearestNeighborInterpolator};

/// Resize filter.
///
/// # Type Parameters
/// * `B` - The Burn backend
/// * `I` - The interpolator type
pub struct ResizeFilter<B, I>
where
    B: Backend,
    I: Interpolator<B>,
{
    size: [usize; 2],
    interpolator: I,
    _phantom: PhantomData<B>,
}

impl<B, I> ResizeFilter<B, I>
where
    B: Backend,
    I: Interpolator<B>,
{
    /// Create a new resize filter.
    ///
    /// # Arguments
    /// * `size` - Output size `[rows, cols]`
    /// * `interpolator` - Interpolator for input sampling
    pub fn new(size: [usize; 2], interpolator: I) -> Self {
        Self {
            size,
            interpolator,
            _phantom: PhantomData,
        }
    }

    /// Output size `[rows, cols]`.
    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    /// Apply filter to a slice.
    pub fn apply(&self, input: &Tensor<B, 2>) -> Tensor<B, 2> {
        let in_size = input.dims();
        if in_size == self.size {
            return input.clone();
        }

        let device = input.device();
        let indices = self.generate_grid_indices(in_size, &device);
        let output_flat = self.interpolator.interpolate(input, indices);
        output_flat.reshape(self.size)
    }

    /// Continuous input indices `[H' * W', 2]`, columns `(x, y)`, row-major over the output.
    fn generate_grid_indices(&self, in_size: [usize; 2], device: &B::Device) -> Tensor<B, 2> {
        let [h, w] = self.size;
        let scale_y = corner_aligned_scale(in_size[0], h);
        let scale_x = corner_aligned_scale(in_size[1], w);

        let y_range = Tensor::<B, 1, Int>::arange(0..h as i64, device);
        let x_range = Tensor::<B, 1, Int>::arange(0..w as i64, device);

        let y_grid = y_range.reshape([h, 1]).repeat(&[1, w]).reshape([h * w]);
        let x_grid = x_range.reshape([1, w]).repeat(&[h, 1]).reshape([h * w]);

        let y_grid = y_grid.float().mul_scalar(scale_y);
        let x_grid = x_grid.float().mul_scalar(scale_x);

        Tensor::cat(vec![x_grid.unsqueeze_dim(1), y_grid.unsqueeze_dim(1)], 1)
    }
}

/// Step between output samples measured in input samples.
fn corner_aligned_scale(input: usize, output: usize) -> f64 {
    if output > 1 {
        (input.saturating_sub(1)) as f64 / (output - 1) as f64
    } else {
        0.0
    }
}

/// Resize `input` to `size` with the given policy.
pub fn resize<B: Backend>(input: &Tensor<B, 2>, size: [usize; 2], policy: InterpolationPolicy) -> Tensor<B, 2> {
    match policy {
        InterpolationPolicy::Bilinear => ResizeFilter::new(size, LinearInterpolator::new()).apply(input),
        InterpolationPolicy::Nearest => ResizeFilter::new(size, NearestNeighborInterpolator::new()).apply(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::{Shape, TensorData};
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    fn plane(rows: usize, cols: usize) -> Tensor<TestBackend, 2> {
        let device = Default::default();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(3.0 * r as f32 + 0.5 * c as f32);
            }
        }
        Tensor::from_data(TensorData::new(data, Shape::new([rows, cols])), &device)
    }

    fn values(t: Tensor<TestBackend, 2>) -> Vec<f32> {
        t.into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_resize_shape() {
        let input = plane(4, 5);
        let output = resize(&input, [7, 3], InterpolationPolicy::Bilinear);
        assert_eq!(output.dims(), [7, 3]);
    }

    #[test]
    fn test_resize_same_size_is_identity() {
        let input = plane(4, 5);
        let output = resize(&input, [4, 5], InterpolationPolicy::Bilinear);
        assert_eq!(values(output), values(input));
    }

    #[test]
    fn test_resize_corners_preserved() {
        let input = plane(4, 5);
        let output = resize(&input, [9, 2], InterpolationPolicy::Bilinear);
        let v = values(output);
        // corners: (0,0)=0, (0,4)=2, (3,0)=9, (3,4)=11
        assert!((v[0] - 0.0).abs() < 1e-4);
        assert!((v[1] - 2.0).abs() < 1e-4);
        assert!((v[16] - 9.0).abs() < 1e-4);
        assert!((v[17] - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_resize_does_not_transpose() {
        // Rows vary by 3 per step, columns by 0.5; a transposed result would swap them
        let input = plane(4, 5);
        let output = resize(&input, [7, 9], InterpolationPolicy::Bilinear);
        let v = values(output);
        // row step in output = 3 * (3 / 6) = 1.5, column step = 0.5 * (4 / 8) = 0.25
        assert!((v[9] - v[0] - 1.5).abs() < 1e-4);
        assert!((v[1] - v[0] - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_resize_roundtrip_linear_exact() {
        let input = plane(4, 5);
        let up = resize(&input, [5, 4], InterpolationPolicy::Bilinear);
        let back = resize(&up, [4, 5], InterpolationPolicy::Bilinear);
        for (a, b) in values(back).iter().zip(values(input).iter()) {
            assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_resize_single_output_row() {
        let input = plane(4, 5);
        let output = resize(&input, [1, 5], InterpolationPolicy::Bilinear);
        // a single output row samples input row 0
        assert_eq!(values(output), values(plane(1, 5)));
    }

    #[test]
    fn test_resize_nearest_upsample() {
        let device = Default::default();
        let input = Tensor::<TestBackend, 2>::from_floats([[1.0, 2.0], [3.0, 4.0]], &device);
        let output = resize(&input, [3, 3], InterpolationPolicy::Nearest);
        let v = values(output);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 2.0);
        assert_eq!(v[6], 3.0);
        assert_eq!(v[8], 4.0);
    }
}
