use crate::model::ClassificationResult;

/// Trait for reporting batch classification progress.
///
/// CLI implements with tracing/indicatif; tests use [`SilentReporter`].
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_batch_start(&self, _total_files: Option<usize>) {}
    fn on_file_complete(&self, _index: usize, _result: &ClassificationResult) {}
    fn on_batch_complete(&self, _total: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
