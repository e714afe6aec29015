use indicatif::{ProgressBar, ProgressStyle};
use retriage_core::{ClassificationResult, ProgressReporter};
use std::sync::Mutex;

/// CLI progress reporter using indicatif.
///
/// - Known batch size: progress bar advanced per file
/// - Unknown batch size: spinner with a running file count
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_batch_start(&self, total_files: Option<usize>) {
        let pb = match total_files {
            Some(total) => {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(
                    ProgressStyle::with_template(
                        "  {spinner:.cyan} Classifying [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
                    )
                    .unwrap()
                    .progress_chars("━╸─")
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::with_template("{spinner:.cyan} {msg}")
                        .unwrap()
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
                );
                pb.set_message("Classifying files...");
                pb
            }
        };
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_file_complete(&self, index: usize, result: &ClassificationResult) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            pb.set_position((index + 1) as u64);
            pb.set_message(result.file_name.clone());
        }
    }

    fn on_batch_complete(&self, total: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Classification complete: {} files in {:.2}s",
            total, duration_secs
        );
    }
}
