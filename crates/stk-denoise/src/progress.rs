//! Progress tracking and callbacks for slice denoising runs.
//!
//! Callbacks are notified once when a run starts, after every finished
//! slice, and once when it completes or fails. Under the parallel strategy
//! slices finish out of order, so `completed` counts finished slices rather
//! than naming the last slice index.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Progress snapshot for a denoising run.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Number of slices finished so far.
    pub completed: usize,
    /// Number of slices in the run.
    pub total: usize,
    /// Time elapsed since start.
    pub elapsed: Duration,
    /// Estimated remaining time.
    pub estimated_remaining: Option<Duration>,
}

impl ProgressInfo {
    pub fn new(completed: usize, total: usize, elapsed: Duration) -> Self {
        Self {
            completed,
            total,
            elapsed,
            estimated_remaining: None,
        }
    }

    /// Progress percentage; a run with no slices is complete.
    pub fn progress_percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }

    /// Estimate remaining time from the mean time per finished slice.
    pub fn calculate_remaining(&mut self) {
        if self.completed > 0 {
            let per_slice = self.elapsed.as_secs_f64() / self.completed as f64;
            let remaining = self.total.saturating_sub(self.completed);
            self.estimated_remaining = Some(Duration::from_secs_f64(per_slice * remaining as f64));
        }
    }
}

/// Observer of a denoising run.
pub trait ProgressCallback: Send + Sync {
    /// Called after each finished slice.
    fn on_progress(&self, info: &ProgressInfo);

    fn on_start(&self, _total: usize) {}

    fn on_complete(&self, _info: &ProgressInfo) {}

    fn on_error(&self, _error: &str) {}
}

/// Logs progress through `tracing` every `log_interval` slices.
#[derive(Debug, Clone)]
pub struct ConsoleProgressCallback {
    log_interval: usize,
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self { log_interval: 50 }
    }
}

impl ConsoleProgressCallback {
    /// An interval of zero logs every slice.
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval: log_interval.max(1),
        }
    }

    pub fn log_interval(&self) -> usize {
        self.log_interval
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        if info.completed % self.log_interval == 0 || info.completed == info.total {
            let remaining = info
                .estimated_remaining
                .map(|d| format!("{:.2}s", d.as_secs_f64()))
                .unwrap_or_else(|| "N/A".to_string());

            tracing::info!(
                "Slice {}/{} ({:.1}%) | Elapsed: {:.2}s | ETA: {}",
                info.completed,
                info.total,
                info.progress_percent(),
                info.elapsed.as_secs_f64(),
                remaining
            );
        }
    }

    fn on_start(&self, total: usize) {
        tracing::info!("Denoising started ({} slices)", total);
    }

    fn on_complete(&self, info: &ProgressInfo) {
        tracing::info!(
            "Denoising completed: {} slices in {:.2}s",
            info.completed,
            info.elapsed.as_secs_f64()
        );
    }

    fn on_error(&self, error: &str) {
        tracing::error!("Denoising failed: {}", error);
    }
}

/// Records every progress snapshot.
#[derive(Debug, Clone, Default)]
pub struct HistoryCallback {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl HistoryCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded snapshots in notification order.
    pub fn get_history(&self) -> Vec<ProgressInfo> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Recorded error messages.
    pub fn get_errors(&self) -> Vec<String> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear(&self) {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl ProgressCallback for HistoryCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(info.clone());
    }

    fn on_error(&self, error: &str) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error.to_string());
    }
}

/// Fans progress out to every registered callback.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    callbacks: Vec<Arc<dyn ProgressCallback>>,
    start_time: Arc<Mutex<Option<Instant>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_callback(&mut self, callback: Arc<dyn ProgressCallback>) {
        self.callbacks.push(callback);
    }

    /// Builder form of [`ProgressTracker::add_callback`].
    pub fn with_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.add_callback(callback);
        self
    }

    pub fn start(&self, total: usize) {
        *self.start_time.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        for callback in &self.callbacks {
            callback.on_start(total);
        }
    }

    pub fn update(&self, completed: usize, total: usize) {
        let mut info = self.snapshot(completed, total);
        info.calculate_remaining();
        for callback in &self.callbacks {
            callback.on_progress(&info);
        }
    }

    pub fn complete(&self, total: usize) {
        let info = self.snapshot(total, total);
        for callback in &self.callbacks {
            callback.on_complete(&info);
        }
    }

    pub fn error(&self, error: &str) {
        for callback in &self.callbacks {
            callback.on_error(error);
        }
    }

    fn snapshot(&self, completed: usize, total: usize) -> ProgressInfo {
        let start_time = *self.start_time.lock().unwrap_or_else(PoisonError::into_inner);
        let elapsed = start_time.map(|t| t.elapsed()).unwrap_or(Duration::ZERO);
        ProgressInfo::new(completed, total, elapsed)
    }
}
