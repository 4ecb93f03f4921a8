//! Explicit run context: compute device and model.

use burn::tensor::backend::Backend;
use stk_model::DenoiseModel;

/// Device and model shared by every slice of a run.
///
/// Created once at startup and handed to a [`crate::SliceDenoiser`]; dropping
/// the denoiser (or calling [`DenoiseContext::into_model`]) releases the model.
pub struct DenoiseContext<B: Backend, M: DenoiseModel<B>> {
    device: B::Device,
    model: M,
}

impl<B: Backend, M: DenoiseModel<B>> DenoiseContext<B, M> {
    pub fn new(device: B::Device, model: M) -> Self {
        Self { device, model }
    }

    /// Device the pipeline computes on.
    pub fn device(&self) -> &B::Device {
        &self.device
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Tear the context down, returning the model.
    pub fn into_model(self) -> M {
        self.model
    }
}
