//! Bilinear interpolation implementation.

use burn::tensor::{Tensor, Int};
use burn::tensor::backend::Backend;
use serde::{Serialize, Deserialize};
use super::trait_::Interpolator;

/// Linear Interpolator.
///
/// Performs bilinear interpolation on `[H, W]` slices. Data that is linear
/// along rows and columns is reproduced exactly at every in-range index.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn gather<B: Backend>(
        flat_data: &Tensor<B, 1>,
        xi: &Tensor<B, 1, Int>,
        yi: &Tensor<B, 1, Int>,
        stride_y: i32,
    ) -> Tensor<B, 1> {
        let idx = yi.clone() * stride_y + xi.clone();
        flat_data.clone().gather(0, idx)
    }
}

impl<B: Backend> Interpolator<B> for LinearInterpolator {
    fn interpolate(&self, data: &Tensor<B, 2>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        let [d0, d1] = data.dims(); // Y, X
        let batch_size = indices.dims()[0];
        let device = indices.device();

        let x = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
        let y = indices.narrow(1, 1, 1).squeeze::<1>(1);

        // Clamp before flooring so border samples keep zero weight outside
        let x = x.clamp(0.0, (d1 - 1) as f64);
        let y = y.clamp(0.0, (d0 - 1) as f64);

        let x0 = x.clone().floor();
        let y0 = y.clone().floor();

        let wx = x - x0.clone();
        let wy = y - y0.clone();

        let x1 = x0.clone() + 1.0;
        let y1 = y0.clone() + 1.0;

        let x0_i = x0.clamp(0.0, (d1 - 1) as f64).int();
        let y0_i = y0.clamp(0.0, (d0 - 1) as f64).int();
        let x1_i = x1.clamp(0.0, (d1 - 1) as f64).int();
        let y1_i = y1.clamp(0.0, (d0 - 1) as f64).int();

        // Stride for [Y, X] layout
        let stride_y = d1 as i32;
        let flat_data = data.clone().reshape([d0 * d1]);

        let v00 = Self::gather(&flat_data, &x0_i, &y0_i, stride_y);
        let v01 = Self::gather(&flat_data, &x0_i, &y1_i, stride_y);
        let v10 = Self::gather(&flat_data, &x1_i, &y0_i, stride_y);
        let v11 = Self::gather(&flat_data, &x1_i, &y1_i, stride_y);

        let one = Tensor::<B, 1>::ones([batch_size], &device);
        let one_minus_wx = one.clone() - wx.clone();
        let one_minus_wy = one - wy.clone();

        let c0 = v00 * one_minus_wx.clone() + v10 * wx.clone();
        let c1 = v01 * one_minus_wx + v11 * wx;

        c0 * one_minus_wy + c1 * wy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use burn::tensor::TensorData;

    type TestBackend = NdArray<f32>;

    fn grid_2x2() -> Tensor<TestBackend, 2> {
        let device = Default::default();
        // Shape [Y=2, X=2]
        Tensor::<TestBackend, 2>::from_data(
            TensorData::new(vec![0.0f32, 1.0, 10.0, 11.0], burn::tensor::Shape::new([2, 2])),
            &device,
        )
    }

    #[test]
    fn test_linear_interpolator_center() {
        let device = Default::default();
        let interpolator = LinearInterpolator::new();

        let center = Tensor::<TestBackend, 2>::from_floats([[0.5, 0.5]], &device);
        let result = interpolator.interpolate(&grid_2x2(), center);
        let result_data = result.into_data();
        let slice = result_data.as_slice::<f32>().unwrap();

        let expected = (0.0 + 1.0 + 10.0 + 11.0) / 4.0;
        assert!((slice[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_linear_interpolation_axes() {
        let device = Default::default();
        let interpolator = LinearInterpolator::new();

        // (x, y): x walks columns, y walks rows
        let indices = Tensor::<TestBackend, 2>::from_floats(
            [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.25, 0.0], [0.0, 0.5]],
            &device,
        );
        let result = interpolator.interpolate(&grid_2x2(), indices);
        let result_data = result.into_data();
        let slice = result_data.as_slice::<f32>().unwrap();

        assert_eq!(slice[0], 0.0);
        assert_eq!(slice[1], 1.0);
        assert_eq!(slice[2], 10.0);
        assert_eq!(slice[3], 11.0);
        assert!((slice[4] - 0.25).abs() < 1e-6);
        assert!((slice[5] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_linear_interpolator_out_of_bounds() {
        let device = Default::default();
        let interpolator = LinearInterpolator::new();

        let indices = Tensor::<TestBackend, 2>::from_floats([[-1.0, -1.0], [5.0, 5.0]], &device);
        let result = interpolator.interpolate(&grid_2x2(), indices);
        let result_data = result.into_data();
        let slice = result_data.as_slice::<f32>().unwrap();

        assert_eq!(slice[0], 0.0);
        assert_eq!(slice[1], 11.0);
    }

    #[test]
    fn test_linear_interpolator_single_row() {
        let device = Default::default();
        let data = Tensor::<TestBackend, 2>::from_floats([[0.0, 10.0, 20.0, 30.0]], &device);
        let interpolator = LinearInterpolator::new();

        let indices = Tensor::<TestBackend, 2>::from_floats([[0.5, 0.0], [2.5, 0.0]], &device);
        let result = interpolator.interpolate(&data, indices);
        let result_data = result.into_data();
        let slice = result_data.as_slice::<f32>().unwrap();

        assert!((slice[0] - 5.0).abs() < 1e-5);
        assert!((slice[1] - 25.0).abs() < 1e-5);
    }
}
