//! Dense 3D seismic volume.
//!
//! Axes are `(inline, crossline, time)`. A slice along one axis keeps the
//! two remaining axes in their original order, so slicing and stacking are
//! exact inverses and never transpose the data.

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};

use crate::error::{Result, StkError};

/// Dense 3D volume of `f32` samples.
///
/// The shape is fixed for the lifetime of the volume. Missing samples are
/// stored as NaN.
///
/// # Examples
/// ```rust
/// use stk_core::Volume;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let values: Vec<f32> = (0..24).map(|v| v as f32).collect();
/// let volume = Volume::<Backend>::from_vec(values, [2, 3, 4], &device).unwrap();
/// assert_eq!(volume.shape(), [2, 3, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct Volume<B: Backend> {
    data: Tensor<B, 3>,
}

impl<B: Backend> Volume<B> {
    /// Wrap an existing tensor.
    pub fn new(data: Tensor<B, 3>) -> Self {
        Self { data }
    }

    /// Build a volume from row-major samples.
    ///
    /// Fails with `ShapeMismatch` when `values.len()` is not the product of
    /// `shape`, and with `InvalidConfiguration` when a dimension is zero.
    pub fn from_vec(values: Vec<f32>, shape: [usize; 3], device: &B::Device) -> Result<Self> {
        if shape.contains(&0) {
            return Err(StkError::invalid_configuration(format!(
                "volume dimensions must be non-zero, got {:?}",
                shape
            )));
        }
        let expected = sample_count(shape);
        if expected != Some(values.len()) {
            return Err(StkError::ShapeMismatch {
                expected: shape.to_vec(),
                actual: vec![values.len()],
            });
        }

        let data = TensorData::new(values, Shape::new(shape));
        Ok(Self::new(Tensor::from_data(data, device)))
    }

    /// Get the sample tensor.
    pub fn data(&self) -> &Tensor<B, 3> {
        &self.data
    }

    /// Consume the volume and return its tensor.
    pub fn into_data(self) -> Tensor<B, 3> {
        self.data
    }

    /// Get the volume shape.
    pub fn shape(&self) -> [usize; 3] {
        self.data.dims()
    }

    /// Get the device holding the samples.
    pub fn device(&self) -> B::Device {
        self.data.device()
    }

    /// Number of slices along `axis`.
    pub fn len_along(&self, axis: usize) -> Result<usize> {
        check_axis(axis)?;
        Ok(self.shape()[axis])
    }

    /// Extract the 2D slice at `index` along `axis`.
    ///
    /// The result keeps the other two axes in their original order:
    /// axis 0 gives `[crossline, time]`, axis 1 gives `[inline, time]`,
    /// axis 2 gives `[inline, crossline]`.
    pub fn slice(&self, axis: usize, index: usize) -> Result<Tensor<B, 2>> {
        let len = self.len_along(axis)?;
        if index >= len {
            return Err(StkError::IndexOutOfBounds { axis, index, len });
        }
        Ok(self.data.clone().narrow(axis, index, 1).squeeze::<2>(axis))
    }

    /// Stack 2D slices along `axis`, the inverse of [`Volume::slice`].
    ///
    /// All slices must share one shape.
    pub fn from_slices(slices: Vec<Tensor<B, 2>>, axis: usize) -> Result<Self> {
        check_axis(axis)?;
        let first = match slices.first() {
            Some(slice) => slice.dims(),
            None => {
                return Err(StkError::invalid_configuration(
                    "cannot build a volume from zero slices",
                ))
            }
        };
        for slice in slices.iter().skip(1) {
            let dims = slice.dims();
            if dims != first {
                return Err(StkError::ShapeMismatch {
                    expected: first.to_vec(),
                    actual: dims.to_vec(),
                });
            }
        }

        Ok(Self::new(Tensor::stack::<3>(slices, axis)))
    }

    /// Copy the samples to the host in row-major order.
    pub fn to_vec(&self) -> Result<Vec<f32>> {
        tensor_to_vec(self.data.clone())
    }
}

/// Number of samples in a volume of `shape`, `None` on overflow.
pub fn sample_count(shape: [usize; 3]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
}

/// Validate an axis index.
pub fn check_axis(axis: usize) -> Result<()> {
    if axis < 3 {
        Ok(())
    } else {
        Err(StkError::InvalidAxis(axis))
    }
}

/// Copy any tensor to the host as `f32` in row-major order.
pub fn tensor_to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| StkError::invalid_configuration(format!("tensor data conversion failed: {:?}", e)))
}
