use crate::model::Determination;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::warn;

mod heuristic;
mod ollama;

pub use heuristic::HeuristicBackend;
pub use ollama::OllamaBackend;

/// One classification request as sent to a backend.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    pub model: String,
    pub instructions: String,
    pub content: String,
    pub temperature: f32,
}

/// Tagged outcome of a backend call. A backend never returns an `Err`; every
/// failure mode is folded into `Failure` with a human-readable reason.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendOutcome {
    Success {
        determination: Determination,
        confidence: u8,
        insights: String,
    },
    Failure {
        reason: String,
    },
}

/// A content classifier. Implementations must be callable from a worker
/// thread and must themselves never panic.
pub trait ClassifierBackend: Send + Sync {
    fn classify(&self, request: &BackendRequest) -> BackendOutcome;

    fn name(&self) -> &'static str;
}

/// Run one backend call under a hard wall-clock budget.
///
/// The call is delegated to a spawned worker thread while this path blocks on
/// the channel with a deadline. On expiry the invocation is abandoned and the
/// worker's eventual result is discarded; the worker is not forcibly
/// terminated and may keep running until it naturally completes.
pub fn invoke_with_timeout(
    backend: &Arc<dyn ClassifierBackend>,
    request: BackendRequest,
    timeout: Duration,
) -> BackendOutcome {
    let (tx, rx) = mpsc::channel();
    let worker_backend = Arc::clone(backend);

    thread::spawn(move || {
        let outcome = worker_backend.classify(&request);
        // The receiver is gone if the caller already timed out; nothing to do.
        let _ = tx.send(outcome);
    });

    match rx.recv_timeout(timeout) {
        Ok(outcome) => outcome,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(
                "Backend call abandoned: timed out after {}s",
                timeout.as_secs_f32()
            );
            BackendOutcome::Failure {
                reason: format!("timed out after {}s", timeout.as_secs_f32()),
            }
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => BackendOutcome::Failure {
            reason: "backend worker terminated before producing a result".to_string(),
        },
    }
}

const REQUIRED_FIELDS: [&str; 3] = ["determination", "confidence", "insights"];

/// Structurally validate a raw backend response: a single JSON object with
/// exactly `determination`, `confidence`, `insights`. Any missing field,
/// extra field, wrong type, or out-of-range value fails with a reason naming
/// the violation.
pub fn parse_outcome(raw: &str) -> BackendOutcome {
    let value: serde_json::Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(err) => {
            return BackendOutcome::Failure {
                reason: format!("response is not valid JSON: {}", err),
            }
        }
    };

    let object = match value.as_object() {
        Some(object) => object,
        None => {
            return BackendOutcome::Failure {
                reason: "response is not a JSON object".to_string(),
            }
        }
    };

    for key in object.keys() {
        if !REQUIRED_FIELDS.contains(&key.as_str()) {
            return BackendOutcome::Failure {
                reason: format!("unexpected field `{}` in response", key),
            };
        }
    }
    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return BackendOutcome::Failure {
                reason: format!("missing required field `{}`", field),
            };
        }
    }

    let determination = match object["determination"].as_str() {
        Some("KEEP") => Determination::Keep,
        Some("DESTROY") => Determination::Destroy,
        Some("TRANSITORY") => Determination::Transitory,
        Some(other) => {
            return BackendOutcome::Failure {
                reason: format!(
                    "field `determination` must be one of KEEP, DESTROY, TRANSITORY; got `{}`",
                    other
                ),
            }
        }
        None => {
            return BackendOutcome::Failure {
                reason: "field `determination` must be a string".to_string(),
            }
        }
    };

    let confidence = match object["confidence"].as_f64() {
        Some(value) if (1.0..=100.0).contains(&value) => value.round() as u8,
        Some(value) => {
            return BackendOutcome::Failure {
                reason: format!("field `confidence` out of range [1,100]: {}", value),
            }
        }
        None => {
            return BackendOutcome::Failure {
                reason: "field `confidence` must be a number".to_string(),
            }
        }
    };

    let insights = match object["insights"].as_str() {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        Some(_) => {
            return BackendOutcome::Failure {
                reason: "field `insights` must be a non-empty string".to_string(),
            }
        }
        None => {
            return BackendOutcome::Failure {
                reason: "field `insights` must be a string".to_string(),
            }
        }
    };

    BackendOutcome::Success {
        determination,
        confidence,
        insights,
    }
}
