use crate::backend::{
    invoke_with_timeout, BackendOutcome, BackendRequest, ClassifierBackend, HeuristicBackend,
    OllamaBackend,
};
use crate::config::{BackendKind, EngineConfig, RetentionPolicy};
use crate::eligibility;
use crate::extract;
use crate::model::{ClassificationResult, FileDescriptor, FileStatus, RunMode};
use crate::scoring;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// The classification decision engine.
///
/// Orchestrates, per file: metadata snapshot, eligibility check, bounded
/// content extraction, the timeout-bounded backend call, and hybrid scoring
/// into one immutable [`ClassificationResult`]. Never returns an error to
/// the caller; every failure mode becomes a result row.
///
/// Built once from configuration by the composition root and shared
/// read-only across sequential calls.
pub struct ClassificationEngine {
    config: EngineConfig,
    policy: RetentionPolicy,
    backend: Arc<dyn ClassifierBackend>,
    cancel: Arc<AtomicBool>,
}

impl ClassificationEngine {
    /// Build an engine, selecting the backend from configuration. The
    /// heuristic backend needs no network; the Ollama backend probes its
    /// service once here and fails fast per call when unreachable.
    pub fn new(config: EngineConfig, policy: RetentionPolicy) -> Self {
        let backend: Arc<dyn ClassifierBackend> = match config.backend {
            BackendKind::Heuristic => {
                Arc::new(HeuristicBackend::new(policy.keyword_table.clone()))
            }
            BackendKind::Ollama => Arc::new(OllamaBackend::connect(
                &config.backend_url,
                Duration::from_secs(config.timeout_seconds),
            )),
        };
        ClassificationEngine {
            config,
            policy,
            backend,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the backend, for composition and tests.
    pub fn with_backend(mut self, backend: Arc<dyn ClassifierBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Shared token for batch cancellation, checked at per-file granularity.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Classify a file on disk. A failed metadata snapshot yields an error
    /// row with best-effort metadata rather than failing the batch.
    pub fn classify_path(&self, path: &Path, run_mode: RunMode) -> ClassificationResult {
        let started = Instant::now();
        match FileDescriptor::from_path(path) {
            Ok(descriptor) => self.classify_from(&descriptor, run_mode, started),
            Err(err) => {
                warn!("Could not stat {}: {}", path.display(), err);
                ClassificationResult::stat_error_row(path, &err.to_string(), elapsed_ms(started))
            }
        }
    }

    /// Classify from an already-taken metadata snapshot.
    pub fn classify(&self, descriptor: &FileDescriptor, run_mode: RunMode) -> ClassificationResult {
        self.classify_from(descriptor, run_mode, Instant::now())
    }

    fn classify_from(
        &self,
        descriptor: &FileDescriptor,
        run_mode: RunMode,
        started: Instant,
    ) -> ClassificationResult {
        if let Some(verdict) = eligibility::classify_eligibility(descriptor, &self.policy, run_mode)
        {
            debug!(
                "Early verdict for {}: {} ({})",
                descriptor.path.display(),
                verdict.determination,
                verdict.reason
            );
            return ClassificationResult::from_descriptor(
                descriptor,
                verdict.determination,
                verdict.confidence,
                verdict.reason,
                verdict.status,
                elapsed_ms(started),
            );
        }

        let content = extract::read_content(
            &descriptor.path,
            self.config.max_lines,
            self.config.max_content_chars,
        );

        let request = BackendRequest {
            model: self.config.model_name.clone(),
            instructions: self.config.instructions.clone(),
            content: content.clone(),
            temperature: self.config.temperature,
        };
        let outcome = invoke_with_timeout(
            &self.backend,
            request,
            Duration::from_secs(self.config.timeout_seconds),
        );

        match outcome {
            BackendOutcome::Success {
                determination,
                confidence,
                insights,
            } => {
                let age_exceeded = descriptor.older_than_years(self.policy.age_threshold_years);
                let confidence =
                    scoring::hybrid_confidence(confidence, determination, &content, age_exceeded);
                ClassificationResult::from_descriptor(
                    descriptor,
                    determination,
                    confidence,
                    insights,
                    FileStatus::Success,
                    elapsed_ms(started),
                )
            }
            BackendOutcome::Failure { reason } => {
                warn!(
                    "Backend {} failed for {}: {}",
                    self.backend.name(),
                    descriptor.path.display(),
                    reason
                );
                ClassificationResult::backend_failure_row(descriptor, &reason, elapsed_ms(started))
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
