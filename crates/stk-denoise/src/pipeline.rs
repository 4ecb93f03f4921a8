//! Slice-by-slice volume denoising.
//!
//! The whole volume is rescaled once from its global intensity range, every
//! slice along the configured axis is pushed through the model at the model's
//! resolution, and the results are stacked back and clamped to the display
//! range.

use std::sync::atomic::{AtomicUsize, Ordering};

use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Tensor};
use rayon::prelude::*;
use stk_core::filter::resize;
use stk_core::volume::{fill_invalid, Volume};
use stk_core::{IntensityRange, OutputRange, Result, StkError};
use stk_model::DenoiseModel;

use crate::cancel::CancellationToken;
use crate::config::{DenoiseConfig, ExecutionStrategy};
use crate::context::DenoiseContext;
use crate::progress::ProgressTracker;

/// Result of a run: the denoised volume on the display range, and the input
/// range it was rescaled from.
#[derive(Debug, Clone)]
pub struct Denoised<B: Backend> {
    pub volume: Volume<B>,
    pub range: IntensityRange,
    pub output_range: OutputRange,
}

impl<B: Backend> Denoised<B> {
    /// Map the denoised volume back onto the input's amplitude range.
    pub fn to_amplitudes(&self) -> Volume<B> {
        Volume::new(
            self.range
                .inverse_rescale(self.volume.data().clone(), &self.output_range),
        )
    }
}

/// Denoises volumes slice by slice with one model.
pub struct SliceDenoiser<B: Backend, M: DenoiseModel<B>> {
    config: DenoiseConfig,
    context: DenoiseContext<B, M>,
    progress: ProgressTracker,
    cancel: CancellationToken,
}

impl<B: Backend, M: DenoiseModel<B>> SliceDenoiser<B, M> {
    /// Create a denoiser; the configuration is validated here.
    pub fn new(config: DenoiseConfig, context: DenoiseContext<B, M>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            context,
            progress: ProgressTracker::new(),
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_progress(mut self, progress: ProgressTracker) -> Self {
        self.progress = progress;
        self
    }

    /// Use `token` to stop the run between slices.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn config(&self) -> &DenoiseConfig {
        &self.config
    }

    pub fn context(&self) -> &DenoiseContext<B, M> {
        &self.context
    }

    /// Release the context.
    pub fn into_context(self) -> DenoiseContext<B, M> {
        self.context
    }

    /// Denoise `volume`, returning a new volume of the same shape with every
    /// value inside the configured output range.
    pub fn denoise_volume(&self, volume: &Volume<B>) -> Result<Volume<B>> {
        self.denoise(volume).map(|denoised| denoised.volume)
    }

    /// Denoise `volume` and keep the intensity range used for rescaling.
    pub fn denoise(&self, volume: &Volume<B>) -> Result<Denoised<B>> {
        let result = self.run(volume);
        if let Err(e) = &result {
            self.progress.error(&e.to_string());
        }
        result
    }

    fn run(&self, volume: &Volume<B>) -> Result<Denoised<B>> {
        let axis = self.config.axis;
        let output_range = self.config.output_range;
        let total = volume.len_along(axis)?;

        let range = IntensityRange::compute(volume.data())?;
        tracing::info!(
            "Denoising {:?} volume along axis {} with {} ({} slices, range [{}, {}])",
            volume.shape(),
            axis,
            self.context.model().name(),
            total,
            range.min,
            range.max
        );

        let data = volume.data().clone().to_device(self.context.device());
        let scaled = Volume::new(fill_invalid(range.rescale(data, &output_range), output_range.lo));

        self.progress.start(total);
        let slices = match self.config.strategy {
            ExecutionStrategy::Sequential => self.run_sequential(&scaled, total)?,
            ExecutionStrategy::Parallel { threads } => self.run_parallel(&scaled, total, threads)?,
        };

        let stacked = Volume::from_slices(slices, axis)?;
        let clamped = output_range.clamp(stacked.into_data());
        self.progress.complete(total);

        Ok(Denoised {
            volume: Volume::new(clamped),
            range,
            output_range,
        })
    }

    fn run_sequential(&self, scaled: &Volume<B>, total: usize) -> Result<Vec<Tensor<B, 2>>> {
        let mut slices = Vec::with_capacity(total);
        for index in 0..total {
            if self.cancel.is_cancelled() {
                return Err(StkError::Cancelled { completed: index });
            }
            let slice = scaled.slice(self.config.axis, index)?;
            slices.push(self.transform_slice(index, slice)?);
            self.progress.update(index + 1, total);
        }
        Ok(slices)
    }

    fn run_parallel(
        &self,
        scaled: &Volume<B>,
        total: usize,
        threads: Option<usize>,
    ) -> Result<Vec<Tensor<B, 2>>> {
        let completed = AtomicUsize::new(0);
        let run = || {
            (0..total)
                .into_par_iter()
                .map(|index| -> Result<Tensor<B, 2>> {
                    if self.cancel.is_cancelled() {
                        return Err(StkError::Cancelled {
                            completed: completed.load(Ordering::SeqCst),
                        });
                    }
                    let slice = scaled.slice(self.config.axis, index)?;
                    let denoised = self.transform_slice(index, slice)?;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    self.progress.update(done, total);
                    Ok(denoised)
                })
                .collect::<Result<Vec<_>>>()
        };

        match threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| StkError::invalid_configuration(format!("cannot build thread pool: {}", e)))?;
                tracing::debug!("Running on a dedicated pool of {} threads", threads);
                pool.install(run)
            }
            None => run(),
        }
    }

    /// Denoise one slice already rescaled to the output range.
    ///
    /// Resizes to the target resolution, standardizes, runs the model,
    /// denormalizes and resizes back to the slice's own shape. `index` only
    /// labels errors.
    pub fn transform_slice(&self, index: usize, slice: Tensor<B, 2>) -> Result<Tensor<B, 2>> {
        let native = slice.dims();
        let target = self.config.target_resolution;
        let policy = self.config.interpolation;
        let standardization = self.config.standardization();

        let resized = resize(&slice, target, policy);
        let input = standardization.apply(resized);

        let output = self
            .context
            .model()
            .denoise(input)
            .map_err(|e| StkError::model_invocation(index, e))?;

        let dims = output.dims();
        if dims != target {
            return Err(StkError::model_invocation(
                index,
                StkError::ShapeMismatch {
                    expected: target.to_vec(),
                    actual: dims.to_vec(),
                },
            ));
        }

        if !all_finite(&output) {
            return Err(StkError::model_invocation(index, "model returned NaN or infinite values"));
        }

        tracing::debug!("Slice {} denoised", index);
        let restored = standardization.invert(output);
        Ok(resize(&restored, native, policy))
    }
}

fn all_finite<B: Backend>(tensor: &Tensor<B, 2>) -> bool {
    let has_nan = tensor.clone().is_nan().any().into_scalar();
    let peak = tensor.clone().abs().max().into_scalar().elem::<f32>();
    !has_nan && peak.is_finite()
}

/// Denoise `volume` along `axis` with default interpolation and a sequential
/// run on the volume's own device.
pub fn denoise_volume<B: Backend, M: DenoiseModel<B>>(
    volume: &Volume<B>,
    axis: usize,
    model: M,
    target_resolution: [usize; 2],
    standardize_mean: f32,
    standardize_scale: f32,
    output_range: OutputRange,
) -> Result<Volume<B>> {
    let config = DenoiseConfig::new()
        .with_axis(axis)
        .with_target_resolution(target_resolution)
        .with_standardization(standardize_mean, standardize_scale)
        .with_output_range(output_range);
    let context = DenoiseContext::new(volume.device(), model);
    SliceDenoiser::new(config, context)?.denoise_volume(volume)
}
