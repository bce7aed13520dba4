//! Per-pass progress display

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

use crate::algorithm::pass::PassReport;
use crate::io::configuration::PROGRESS_BAR_WIDTH;

static OVERALL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Passes: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static PASS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner} {prefix} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Coordinates the overall bar and one line per pass
pub struct ProgressManager {
    multi_progress: MultiProgress,
    overall: Option<ProgressBar>,
    current: Option<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            overall: None,
            current: None,
        }
    }

    /// Shared display that log output is routed through
    pub const fn multi_progress(&self) -> &MultiProgress {
        &self.multi_progress
    }

    /// Create the overall bar
    pub fn initialize(&mut self, pass_count: usize) {
        let bar = ProgressBar::new(pass_count as u64);
        bar.set_style(OVERALL_STYLE.clone());
        self.overall = Some(self.multi_progress.add(bar));
    }

    /// Show a line for a pass that has started
    pub fn start_pass(&mut self, index: usize) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(PASS_STYLE.clone());
        bar.set_prefix(format!("Pass {index}"));
        bar.set_message("placing rooms");
        bar.enable_steady_tick(Duration::from_millis(100));
        self.current = Some(self.multi_progress.add(bar));
    }

    /// Replace the pass line with its outcome
    pub fn complete_pass(&mut self, report: &PassReport) {
        if let Some(bar) = self.current.take() {
            let mark = if report.is_complete() { "✓" } else { "✗" };
            bar.finish_with_message(format!(
                "{mark} {}/{} rooms, {} requeues",
                report.placed.len(),
                report.queued,
                report.requeues
            ));
        }
        if let Some(ref overall) = self.overall {
            overall.inc(1);
        }
    }

    /// Clean up all progress displays
    pub fn finish(&mut self) {
        if let Some(bar) = self.current.take() {
            bar.abandon();
        }
        if let Some(ref overall) = self.overall {
            overall.finish();
        }
        let _ = self.multi_progress.clear();
    }
}
