use crate::engine::ClassificationEngine;
use crate::model::{ClassificationResult, FileDescriptor, RunMode};
use crate::progress::ProgressReporter;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::info;

/// Lazily classify a descriptor stream, one file at a time, in supplied
/// order. Each input descriptor yields exactly one result; a failure on one
/// file becomes an error row and never stops enumeration. The engine's
/// cancel token is checked before each file; cancellation ends the stream
/// cleanly.
pub fn classify_many<'a, I>(
    engine: &'a ClassificationEngine,
    descriptors: I,
    run_mode: RunMode,
    reporter: &'a dyn ProgressReporter,
) -> impl Iterator<Item = ClassificationResult> + 'a
where
    I: IntoIterator<Item = FileDescriptor>,
    I::IntoIter: 'a,
{
    let cancel = engine.cancel_token();
    let interval = engine.config().progress_interval.max(1);

    descriptors
        .into_iter()
        .take_while(move |_| !cancel.load(Ordering::Relaxed))
        .enumerate()
        .map(move |(index, descriptor)| {
            let result = engine.classify(&descriptor, run_mode);
            reporter.on_file_complete(index, &result);
            if (index + 1) % interval == 0 {
                info!("Processed {} files", index + 1);
            }
            result
        })
}

/// Drive a whole batch to completion, with start/complete reporting.
pub fn classify_all(
    engine: &ClassificationEngine,
    descriptors: Vec<FileDescriptor>,
    run_mode: RunMode,
    reporter: &dyn ProgressReporter,
) -> Vec<ClassificationResult> {
    let started = Instant::now();
    reporter.on_batch_start(Some(descriptors.len()));
    let results: Vec<ClassificationResult> =
        classify_many(engine, descriptors, run_mode, reporter).collect();
    reporter.on_batch_complete(results.len(), started.elapsed().as_secs_f64());
    results
}
