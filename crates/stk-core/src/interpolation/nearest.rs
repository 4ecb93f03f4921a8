//! Nearest neighbor interpolation implementation.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use serde::{Serialize, Deserialize};
use super::trait_::Interpolator;

/// Nearest Neighbor Interpolator.
///
/// Rounds each continuous index to the nearest sample.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    /// Create a new nearest neighbor interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for NearestNeighborInterpolator {
    fn interpolate(&self, data: &Tensor<B, 2>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        let [d0, d1] = data.dims(); // Y, X

        // indices: (x, y)
        let x = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = indices.narrow(1, 1, 1).squeeze::<1>(1);

        let x_i = x.round().clamp(0.0, (d1 - 1) as f64).int();
        let y_i = y.round().clamp(0.0, (d0 - 1) as f64).int();

        let stride_y = d1 as i32;
        let idx = y_i * stride_y + x_i;
        let flat_data = data.clone().reshape([d0 * d1]);
        flat_data.gather(0, idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_nearest_neighbor_interpolator_rounding() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0], [2.0, 3.0]], &device);
        let interpolator = NearestNeighborInterpolator::new();

        let indices = Tensor::<TestBackend, 2>::from_floats([[0.4, 0.4], [0.6, 0.6]], &device);
        let values = interpolator.interpolate(&data, indices);
        let data_slice = values.to_data();
        let data_slice_ref = data_slice.as_slice::<f32>().unwrap();

        assert_eq!(data_slice_ref[0], 0.0);
        assert_eq!(data_slice_ref[1], 3.0);
    }

    #[test]
    fn test_nearest_neighbor_interpolator_axes() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0], [2.0, 3.0]], &device);
        let interpolator = NearestNeighborInterpolator::new();

        // (1, 0) is column 1, row 0
        let indices = Tensor::<TestBackend, 2>::from_floats([[1.0, 0.0]], &device);
        let val = interpolator.interpolate(&data, indices).into_data().as_slice::<f32>().unwrap()[0];

        assert_eq!(val, 1.0);
    }
}
