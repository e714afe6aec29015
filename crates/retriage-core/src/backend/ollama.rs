use super::{parse_outcome, BackendOutcome, BackendRequest, ClassifierBackend};
use std::time::Duration;
use tracing::{info, warn};

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for an Ollama-protocol inference service.
///
/// Reachability is probed once at construction. An unreachable or
/// unconfigured service makes every subsequent call fail fast with
/// "service unavailable", without attempting a network call.
pub struct OllamaBackend {
    client: Option<reqwest::blocking::Client>,
    base_url: String,
    available: bool,
}

impl OllamaBackend {
    pub fn connect(base_url: &str, request_timeout: Duration) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = match reqwest::blocking::Client::builder()
            .timeout(request_timeout)
            .build()
        {
            Ok(client) => client,
            Err(err) => {
                warn!("Could not build HTTP client: {}", err);
                return OllamaBackend {
                    client: None,
                    base_url,
                    available: false,
                };
            }
        };

        let available = if base_url.is_empty() {
            false
        } else {
            match client
                .get(format!("{}/api/tags", base_url))
                .timeout(PROBE_TIMEOUT)
                .send()
            {
                Ok(response) => response.status().is_success(),
                Err(err) => {
                    warn!("Inference service probe failed at {}: {}", base_url, err);
                    false
                }
            }
        };

        if available {
            info!("Inference service reachable at {}", base_url);
        }

        OllamaBackend {
            client: Some(client),
            base_url,
            available,
        }
    }
}

impl ClassifierBackend for OllamaBackend {
    fn classify(&self, request: &BackendRequest) -> BackendOutcome {
        let client = match (&self.client, self.available) {
            (Some(client), true) => client,
            _ => {
                return BackendOutcome::Failure {
                    reason: "service unavailable".to_string(),
                }
            }
        };

        let body = serde_json::json!({
            "model": request.model,
            "system": request.instructions,
            "prompt": request.content,
            "stream": false,
            "format": "json",
            "options": { "temperature": request.temperature },
        });

        let response = match client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
        {
            Ok(response) => response,
            Err(err) => {
                return BackendOutcome::Failure {
                    reason: format!("backend request failed: {}", err),
                }
            }
        };

        if !response.status().is_success() {
            return BackendOutcome::Failure {
                reason: format!("backend returned HTTP {}", response.status()),
            };
        }

        let envelope: serde_json::Value = match response.json() {
            Ok(envelope) => envelope,
            Err(err) => {
                return BackendOutcome::Failure {
                    reason: format!("backend response was not JSON: {}", err),
                }
            }
        };

        match envelope.get("response").and_then(|r| r.as_str()) {
            Some(raw) => parse_outcome(raw),
            None => BackendOutcome::Failure {
                reason: "backend envelope missing `response` field".to_string(),
            },
        }
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_service_fails_fast() {
        let backend = OllamaBackend {
            client: None,
            base_url: String::new(),
            available: false,
        };
        let outcome = backend.classify(&BackendRequest {
            model: "m".to_string(),
            instructions: String::new(),
            content: "text".to_string(),
            temperature: 0.1,
        });
        assert_eq!(
            outcome,
            BackendOutcome::Failure {
                reason: "service unavailable".to_string()
            }
        );
    }
}
