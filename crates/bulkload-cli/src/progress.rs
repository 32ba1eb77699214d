//! Progress bars for imports and downloads

use std::time::Duration;

use bulkload_client::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar driven by import milestones
pub struct ImportProgress {
    bar: ProgressBar,
}

impl ImportProgress {
    pub fn new(filename: &str, size: Option<u64>) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let label = truncate_filename(filename, 30);
        bar.set_message(match size {
            Some(bytes) => format!("{} ({})", label, format_bytes(bytes)),
            None => label,
        });
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A bar that never draws
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ProgressSink for ImportProgress {
    fn on_progress(&self, percent: u8) {
        if percent == 0 {
            // Reset after the cooldown; the attempt is over
            self.finish();
            return;
        }
        self.bar.set_position(u64::from(percent));
    }

    fn on_settled(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }
}

/// Create a spinner for operations without known size
pub fn create_spinner(message: &str, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Truncate filename for display
fn truncate_filename(filename: &str, max_len: usize) -> String {
    let count = filename.chars().count();
    if count <= max_len {
        filename.to_string()
    } else {
        let tail: String = filename.chars().skip(count - max_len + 3).collect();
        format!("...{}", tail)
    }
}

/// Format bytes as human readable string
pub fn format_bytes(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Format duration as human readable string
pub fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs == 0 {
        format!("{}ms", elapsed.as_millis())
    } else if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
