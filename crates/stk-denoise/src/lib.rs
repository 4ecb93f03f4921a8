pub mod config;
pub mod context;
pub mod cancel;
pub mod progress;
pub mod pipeline;

pub use config::{DenoiseConfig, ExecutionStrategy};
pub use context::DenoiseContext;
pub use cancel::CancellationToken;
pub use progress::{ConsoleProgressCallback, HistoryCallback, ProgressCallback, ProgressInfo, ProgressTracker};
pub use pipeline::{denoise_volume, Denoised, SliceDenoiser};
