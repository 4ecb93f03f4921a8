use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use stk_denoise::{ProgressCallback, ProgressInfo};

/// Terminal progress bar driven by pipeline progress.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Result<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} slices ({eta})")?
                .progress_chars("#>-"),
        );
        Ok(Self { bar })
    }
}

impl ProgressCallback for BarProgress {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    // one notification per finished slice, in any order
    fn on_progress(&self, _info: &ProgressInfo) {
        self.bar.inc(1);
    }

    fn on_complete(&self, _info: &ProgressInfo) {
        self.bar.finish_with_message("Denoising complete");
    }

    fn on_error(&self, error: &str) {
        self.bar.abandon_with_message(error.to_string());
    }
}
