//! Adapter between 2D slices and batched network tensors.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use stk_core::{ModelError, StkError};

use crate::model::DenoiseModel;

/// A network with a batched single-channel forward pass `[N, 1, H, W] -> [N, 1, H, W]`.
///
/// This is where a pretrained burn module plugs in; its weights and layers
/// stay behind this trait.
pub trait SliceNetwork<B: Backend>: Send + Sync {
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4>;
}

/// Adapter turning a [`SliceNetwork`] into a [`DenoiseModel`].
///
/// Moves each slice to the network's device, adds the batch and channel
/// dimensions, and checks the output shape before removing them again.
pub struct NetworkModel<B: Backend, N: SliceNetwork<B>> {
    network: N,
    device: B::Device,
    name: String,
}

impl<B: Backend, N: SliceNetwork<B>> NetworkModel<B, N> {
    /// Create new adapter
    pub fn new(network: N, device: B::Device) -> Self {
        tracing::debug!("Network model on {:?}", device);
        Self {
            network,
            device,
            name: "network".to_string(),
        }
    }

    /// Set the name used in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Get the device
    pub fn device(&self) -> B::Device {
        self.device.clone()
    }

    /// Get the wrapped network.
    pub fn network(&self) -> &N {
        &self.network
    }

    /// Convert slice `[H, W]` to network input `[1, 1, H, W]`
    pub fn slice_to_batch(&self, slice: Tensor<B, 2>) -> Tensor<B, 4> {
        let [h, w] = slice.dims();
        slice.to_device(&self.device).reshape([1, 1, h, w])
    }

    /// Convert network output `[1, 1, H, W]` back to a slice `[H, W]`
    pub fn batch_to_slice(&self, batch: Tensor<B, 4>, expected: [usize; 2]) -> Result<Tensor<B, 2>, StkError> {
        let dims = batch.dims();
        if dims != [1, 1, expected[0], expected[1]] {
            return Err(StkError::ShapeMismatch {
                expected: vec![1, 1, expected[0], expected[1]],
                actual: dims.to_vec(),
            });
        }
        Ok(batch.reshape(expected))
    }
}

impl<B: Backend, N: SliceNetwork<B>> DenoiseModel<B> for NetworkModel<B, N> {
    fn denoise(&self, input: Tensor<B, 2>) -> Result<Tensor<B, 2>, ModelError> {
        let source_device = input.device();
        let dims = input.dims();
        let output = self.network.forward(self.slice_to_batch(input));
        let slice = self.batch_to_slice(output, dims)?;
        Ok(slice.to_device(&source_device))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
