use burn::tensor::backend::Backend;
use burn::tensor::module::conv1d;
use burn::tensor::ops::ConvOptions;
use burn::tensor::Tensor;
use stk_core::{ModelError, Result, StkError};

use crate::model::DenoiseModel;

/// Gaussian smoothing baseline.
///
/// A classical stand-in for a pretrained denoiser: separable Gaussian
/// convolution along rows and columns. Border samples are normalized by the
/// kernel mass that falls inside the slice, so a constant slice stays
/// constant.
#[derive(Debug, Clone)]
pub struct GaussianModel {
    sigmas: [f64; 2],
    max_kernel_width: usize,
}

impl GaussianModel {
    /// Create a Gaussian model with standard deviations `[rows, cols]` in samples.
    pub fn new(sigmas: [f64; 2]) -> Result<Self> {
        if sigmas.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(StkError::invalid_configuration(format!(
                "gaussian sigmas must be finite and non-negative, got {:?}",
                sigmas
            )));
        }
        tracing::debug!("Gaussian model with sigmas {:?}", sigmas);
        Ok(Self {
            sigmas,
            max_kernel_width: 33,
        })
    }

    /// Set the maximum kernel width (radius * 2 + 1).
    pub fn with_max_kernel_width(mut self, width: usize) -> Self {
        self.max_kernel_width = width.max(1);
        self
    }

    /// Smooth a slice.
    pub fn apply<B: Backend>(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut data = input;
        // dim 1 runs along columns, dim 0 along rows
        for dim in [1usize, 0] {
            let sigma = self.sigmas[dim];
            if sigma <= 1e-6 {
                continue;
            }
            let kernel = self.generate_kernel(sigma);
            data = if dim == 1 {
                Self::convolve_rows(data, &kernel)
            } else {
                Self::convolve_rows(data.transpose(), &kernel).transpose()
            };
        }
        data
    }

    fn generate_kernel(&self, sigma: f64) -> Vec<f32> {
        let radius = (3.0 * sigma).ceil() as usize;
        let width = (2 * radius + 1).min(self.max_kernel_width);
        let radius = (width - 1) / 2;

        let two_sigma2 = 2.0 * sigma * sigma;
        let mut kernel: Vec<f64> = (0..=(2 * radius))
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-x * x / two_sigma2).exp()
            })
            .collect();
        let sum: f64 = kernel.iter().sum();
        for v in &mut kernel {
            *v /= sum;
        }
        kernel.into_iter().map(|v| v as f32).collect()
    }

    /// Convolve each row of `[H, W]` with `kernel`.
    fn convolve_rows<B: Backend>(input: Tensor<B, 2>, kernel: &[f32]) -> Tensor<B, 2> {
        let [h, w] = input.dims();
        let device = input.device();
        let k = kernel.len();
        let weight = Tensor::<B, 1>::from_floats(kernel, &device).reshape([1, 1, k]);
        let options = || ConvOptions::new([1], [k / 2], [1], 1);

        let rows = input.reshape([h, 1, w]);
        let mass = Tensor::<B, 3>::ones([1, 1, w], &device);

        let smoothed = conv1d(rows, weight.clone(), None, options());
        let mass = conv1d(mass, weight, None, options());

        (smoothed / mass).reshape([h, w])
    }
}

impl<B: Backend> DenoiseModel<B> for GaussianModel {
    fn denoise(&self, input: Tensor<B, 2>) -> std::result::Result<Tensor<B, 2>, ModelError> {
        Ok(self.apply(input))
    }

    fn name(&self) -> &str {
        "gaussian"
    }
}
