use burn::tensor::{Shape, Tensor, TensorData};
use burn_ndarray::NdArray;
use proptest::prelude::*;
use stk_core::filter::resize;
use stk_core::volume::tensor_to_vec;
use stk_core::InterpolationPolicy;

type Backend = NdArray<f32>;

fn plane(rows: usize, cols: usize, a: f32, b: f32, c: f32) -> Tensor<Backend, 2> {
    let device = Default::default();
    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for col in 0..cols {
            data.push(a * r as f32 + b * col as f32 + c);
        }
    }
    Tensor::from_data(TensorData::new(data, Shape::new([rows, cols])), &device)
}

proptest! {
    #[test]
    fn test_roundtrip_reproduces_linear_slices(
        rows in 2usize..12, cols in 2usize..12,
        target_rows in 2usize..16, target_cols in 2usize..16,
        a in -10.0f32..10.0, b in -10.0f32..10.0, c in 0.0f32..100.0,
    ) {
        let input = plane(rows, cols, a, b, c);
        let resized = resize(&input, [target_rows, target_cols], InterpolationPolicy::Bilinear);
        prop_assert_eq!(resized.dims(), [target_rows, target_cols]);

        let back = resize(&resized, [rows, cols], InterpolationPolicy::Bilinear);
        prop_assert_eq!(back.dims(), [rows, cols]);

        let original = tensor_to_vec(input).unwrap();
        let restored = tensor_to_vec(back).unwrap();
        for (x, y) in restored.iter().zip(original.iter()) {
            prop_assert!((x - y).abs() < 1e-2, "{} vs {}", x, y);
        }
    }
}

#[test]
fn test_upsample_roundtrip_smooth_slice() {
    // Upsampling then downsampling a smooth non-linear slice stays close
    let device = Default::default();
    let (rows, cols) = (20, 30);
    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for col in 0..cols {
            data.push(((r as f32) * 0.2).sin() * 50.0 + ((col as f32) * 0.1).cos() * 30.0 + 100.0);
        }
    }
    let input = Tensor::<Backend, 2>::from_data(TensorData::new(data, Shape::new([rows, cols])), &device);

    let up = resize(&input, [400, 160], InterpolationPolicy::Bilinear);
    let back = resize(&up, [rows, cols], InterpolationPolicy::Bilinear);

    let original = tensor_to_vec(input).unwrap();
    let restored = tensor_to_vec(back).unwrap();
    let max_err = restored
        .iter()
        .zip(original.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f32, f32::max);
    assert!(max_err < 1.5, "max round-trip error {}", max_err);
}
