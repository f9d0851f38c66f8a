//! Download progress display.
//!
//! A thin wrapper over `indicatif` that renders the downloader's
//! `(bytes_so_far, total_bytes)` callbacks as a byte-based progress bar.
//! When disabled (quiet mode, `--no-progress`, non-interactive output) it
//! swallows all updates via a hidden bar.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

fn download_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap()
        .progress_chars("━╸━")
}

/// A byte-based progress bar for one download.
#[derive(Clone)]
pub struct DownloadProgress {
    inner: IndicatifBar,
}

impl DownloadProgress {
    /// Creates a bar; `enabled: false` yields a hidden bar that ignores
    /// every update.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        let inner = if enabled {
            let bar = IndicatifBar::new(0);
            bar.set_style(download_style());
            bar.set_prefix("Downloading");
            bar
        } else {
            IndicatifBar::hidden()
        };
        Self { inner }
    }

    /// Applies one `(bytes_so_far, total_bytes)` callback.
    pub fn update(&self, bytes_so_far: u64, total_bytes: u64) {
        if self.inner.length() != Some(total_bytes) {
            self.inner.set_length(total_bytes);
        }
        self.inner.set_position(bytes_so_far);
    }

    /// Completes the bar and leaves a final line.
    pub fn finish(&self) {
        self.inner.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar_accepts_updates() {
        let progress = DownloadProgress::new(false);
        progress.update(10, 100);
        progress.update(100, 100);
        progress.finish();
    }

    #[test]
    fn test_length_follows_total() {
        let progress = DownloadProgress::new(true);
        progress.update(512, 2048);
        assert_eq!(progress.inner.length(), Some(2048));
        assert_eq!(progress.inner.position(), 512);
        progress.finish();
    }
}
