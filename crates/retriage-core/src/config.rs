use crate::error::Error;
use crate::model::Determination;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::collections::HashSet;

/// Top-level configuration: scan roots plus engine and policy sections.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub root_paths: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub engine: EngineConfig,
    pub policy: RetentionPolicy,
}

/// Which classification backend the engine is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Deterministic keyword heuristic, no network dependency.
    #[default]
    Heuristic,
    /// Ollama-protocol inference service.
    Ollama,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub backend: BackendKind,
    pub model_name: String,
    pub backend_url: String,
    /// System instructions sent with every backend request.
    pub instructions: String,
    pub temperature: f32,
    /// Hard wall-clock budget for one backend call.
    pub timeout_seconds: u64,
    /// Content extraction budget: lines first, then characters.
    pub max_lines: usize,
    pub max_content_chars: usize,
    /// Batch driver emits a progress log line every this many files.
    pub progress_interval: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            backend: BackendKind::Heuristic,
            model_name: "records-classifier-phi2:latest".to_string(),
            backend_url: "http://localhost:11434".to_string(),
            instructions: "You are a records-retention classifier. Given document \
                           text, respond with a single JSON object containing \
                           determination (KEEP, DESTROY, or TRANSITORY), confidence \
                           (1-100), and insights citing the content."
                .to_string(),
            temperature: 0.1,
            timeout_seconds: 60,
            max_lines: 100,
            max_content_chars: 4000,
            progress_interval: 10,
        }
    }
}

/// One ordered entry of the keyword table: a schedule label, the
/// determination it maps to, and its keywords (matched case-insensitively).
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordRule {
    pub label: String,
    pub determination: Determination,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    /// True when `name` names this rule, by schedule label or by mapped
    /// determination (operators use both interchangeably in audits).
    pub fn matches_label(&self, name: &str) -> bool {
        self.label.eq_ignore_ascii_case(name)
            || self.determination.as_str().eq_ignore_ascii_case(name)
    }
}

/// Records-retention policy. Immutable for the engine's lifetime.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    pub include_extensions: HashSet<String>,
    pub exclude_extensions: HashSet<String>,
    pub age_threshold_years: u64,
    pub keyword_table: Vec<KeywordRule>,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        RetentionPolicy {
            include_extensions: [
                ".txt", ".csv", ".docx", ".xlsx", ".pptx", ".pdf", ".html", ".htm", ".md",
                ".rtf", ".odt", ".xml", ".json", ".yaml", ".yml", ".tsv",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            exclude_extensions: [
                ".tmp", ".bak", ".old", ".zip", ".rar", ".tar", ".gz", ".7z", ".exe", ".dll",
                ".sys", ".iso", ".dmg", ".apk", ".msi", ".ps1", ".psd1", ".psm1", ".db",
                ".mdb", ".accdb", ".sqlite", ".dbf", ".log", ".swp", ".swo",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            age_threshold_years: 6,
            keyword_table: vec![
                KeywordRule {
                    label: "TRANSITORY".to_string(),
                    determination: Determination::Transitory,
                    keywords: ["transitory", "temporary", "short-term", "routine", "informal"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                },
                KeywordRule {
                    label: "OFFICIAL".to_string(),
                    determination: Determination::Keep,
                    keywords: ["official", "permanent", "record", "retention", "archival"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                },
            ],
        }
    }
}

impl RetentionPolicy {
    pub fn rule_for_label(&self, name: &str) -> Option<&KeywordRule> {
        self.keyword_table.iter().find(|r| r.matches_label(name))
    }
}

pub fn load_configuration() -> Result<AppConfig, Error> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("RETRIAGE").separator("__"))
        .build()?;
    let app_config: AppConfig = builder.try_deserialize()?;
    validate(&app_config)?;
    Ok(app_config)
}

fn validate(config: &AppConfig) -> Result<(), Error> {
    if config.policy.age_threshold_years < 1 {
        return Err(Error::Validation(
            "policy.age_threshold_years must be at least 1".to_string(),
        ));
    }
    if config.engine.timeout_seconds < 1 {
        return Err(Error::Validation(
            "engine.timeout_seconds must be at least 1".to_string(),
        ));
    }
    Ok(())
}
