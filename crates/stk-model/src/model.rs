//! The opaque model capability.
//!
//! A model maps one standardized single-channel slice `[H, W]` to a slice of
//! the same shape in the same standardized space. Nothing else about the
//! model is assumed, so an in-process network, a remote inference client or
//! a classical filter are all interchangeable.

use std::sync::Arc;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use stk_core::ModelError;

/// Stateless 2D-array-to-2D-array denoiser.
///
/// Implementations must be shareable across worker threads; a run may call
/// `denoise` concurrently for different slices.
pub trait DenoiseModel<B: Backend>: Send + Sync {
    /// Denoise one standardized slice.
    fn denoise(&self, input: Tensor<B, 2>) -> Result<Tensor<B, 2>, ModelError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "model"
    }
}

impl<B: Backend, M: DenoiseModel<B> + ?Sized> DenoiseModel<B> for Arc<M> {
    fn denoise(&self, input: Tensor<B, 2>) -> Result<Tensor<B, 2>, ModelError> {
        (**self).denoise(input)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<B: Backend, M: DenoiseModel<B> + ?Sized> DenoiseModel<B> for Box<M> {
    fn denoise(&self, input: Tensor<B, 2>) -> Result<Tensor<B, 2>, ModelError> {
        (**self).denoise(input)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityModel;

impl<B: Backend> DenoiseModel<B> for IdentityModel {
    fn denoise(&self, input: Tensor<B, 2>) -> Result<Tensor<B, 2>, ModelError> {
        Ok(input)
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Adapts a closure into a model.
pub struct FnModel<F> {
    name: String,
    f: F,
}

impl<F> FnModel<F> {
    /// Wrap `f` under the given log name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<B, F> DenoiseModel<B> for FnModel<F>
where
    B: Backend,
    F: Fn(Tensor<B, 2>) -> Result<Tensor<B, 2>, ModelError> + Send + Sync,
{
    fn denoise(&self, input: Tensor<B, 2>) -> Result<Tensor<B, 2>, ModelError> {
        (self.f)(input)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_identity_model() {
        let device = Default::default();
        let input = Tensor::<TestBackend, 2>::from_floats([[1.0, 2.0], [3.0, 4.0]], &device);
        let output = IdentityModel.denoise(input.clone()).unwrap();
        assert_eq!(
            output.into_data().to_vec::<f32>().unwrap(),
            input.into_data().to_vec::<f32>().unwrap()
        );
    }

    #[test]
    fn test_fn_model_error_passthrough() {
        let device = Default::default();
        let model = FnModel::new("failing", |_input: Tensor<TestBackend, 2>| -> Result<Tensor<TestBackend, 2>, ModelError> {
            Err("weights not loaded".into())
        });
        let input = Tensor::<TestBackend, 2>::zeros([2, 2], &device);
        let err = model.denoise(input).unwrap_err();
        assert_eq!(err.to_string(), "weights not loaded");
        assert_eq!(DenoiseModel::<TestBackend>::name(&model), "failing");
    }

    #[test]
    fn test_shared_model() {
        let device = Default::default();
        let shared: Arc<dyn DenoiseModel<TestBackend>> = Arc::new(IdentityModel);
        let input = Tensor::<TestBackend, 2>::ones([2, 3], &device);
        assert_eq!(shared.denoise(input).unwrap().dims(), [2, 3]);
        assert_eq!(shared.name(), "identity");
    }
}
