use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Maximum length of a user-visible error message on a result row.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// Retention verdict for a file.
///
/// `Error` is engine-internal: it marks a backend failure and is never part
/// of a backend response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Determination {
    #[serde(rename = "KEEP")]
    Keep,
    #[serde(rename = "DESTROY")]
    Destroy,
    #[serde(rename = "TRANSITORY")]
    Transitory,
    #[serde(rename = "NA")]
    Na,
    #[serde(rename = "ERROR")]
    Error,
}

impl Determination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Determination::Keep => "KEEP",
            Determination::Destroy => "DESTROY",
            Determination::Transitory => "TRANSITORY",
            Determination::Na => "NA",
            Determination::Error => "ERROR",
        }
    }
}

impl fmt::Display for Determination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a run treats file content.
///
/// `Classification` performs full content-based analysis; `LastModified` is a
/// metadata-only sweep that destroys aged files and never reads content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Classification,
    LastModified,
}

/// Processing outcome for a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Success,
    Skipped,
    Error,
}

/// Immutable metadata snapshot of a file, taken once per classification
/// attempt.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified_time: SystemTime,
    /// Lowercase extension with leading dot, empty if none.
    pub extension: String,
}

impl FileDescriptor {
    /// Snapshot a file on disk.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(FileDescriptor {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            modified_time: metadata.modified()?,
            extension: extension_of(path),
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Resolved absolute path where possible, the raw path otherwise.
    pub fn full_path(&self) -> String {
        fs::canonicalize(&self.path)
            .unwrap_or_else(|_| self.path.clone())
            .to_string_lossy()
            .into_owned()
    }

    /// True if the file was last modified before `now - years * 365 days`.
    pub fn older_than_years(&self, years: u64) -> bool {
        let threshold = SystemTime::now() - Duration::from_secs(years * 365 * 24 * 3600);
        self.modified_time < threshold
    }
}

/// Lowercase extension with leading dot, mirroring how operators write
/// retention schedules (".txt", ".pdf"). Empty string when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// One classification decision. Created exactly once per
/// (file, engine-invocation) pair and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    pub file_name: String,
    pub extension: String,
    pub full_path: String,
    pub last_modified: String,
    pub size_kb: f64,
    pub model_determination: Determination,
    pub confidence_score: u8,
    pub contextual_insights: String,
    pub status: FileStatus,
    pub processing_time_ms: u64,
    pub error_message: String,
}

impl ClassificationResult {
    pub fn from_descriptor(
        descriptor: &FileDescriptor,
        determination: Determination,
        confidence_score: u8,
        contextual_insights: String,
        status: FileStatus,
        processing_time_ms: u64,
    ) -> Self {
        ClassificationResult {
            file_name: descriptor.file_name(),
            extension: descriptor.extension.clone(),
            full_path: descriptor.full_path(),
            last_modified: format_timestamp(descriptor.modified_time),
            size_kb: size_kb(descriptor.size_bytes),
            model_determination: determination,
            confidence_score: confidence_score.min(100),
            contextual_insights,
            status,
            processing_time_ms,
            error_message: String::new(),
        }
    }

    /// Error row carrying whatever metadata could be gathered. The message is
    /// truncated for display; insights stay non-empty.
    pub fn error_row(
        descriptor: &FileDescriptor,
        message: &str,
        processing_time_ms: u64,
    ) -> Self {
        let truncated = truncate_message(message);
        let mut row = Self::from_descriptor(
            descriptor,
            Determination::Error,
            0,
            format!("Processing error: {}", truncated),
            FileStatus::Error,
            processing_time_ms,
        );
        row.error_message = truncated;
        row
    }

    /// Error row for a failed backend call. Insights carry the failure
    /// reason verbatim; no substitute verdict is invented.
    pub fn backend_failure_row(
        descriptor: &FileDescriptor,
        reason: &str,
        processing_time_ms: u64,
    ) -> Self {
        let mut row = Self::from_descriptor(
            descriptor,
            Determination::Error,
            0,
            reason.to_string(),
            FileStatus::Error,
            processing_time_ms,
        );
        row.error_message = truncate_message(reason);
        row
    }

    /// Error row for a file that could not even be stat'ed. Best-effort
    /// metadata: current time, zero size.
    pub fn stat_error_row(path: &Path, message: &str, processing_time_ms: u64) -> Self {
        let descriptor = FileDescriptor {
            path: path.to_path_buf(),
            size_bytes: 0,
            modified_time: SystemTime::now(),
            extension: extension_of(path),
        };
        Self::error_row(&descriptor, message, processing_time_ms)
    }
}

pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn size_kb(size_bytes: u64) -> f64 {
    (size_bytes as f64 / 1024.0 * 100.0).round() / 100.0
}

pub fn truncate_message(message: &str) -> String {
    message.chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lowercased_with_dot() {
        assert_eq!(extension_of(Path::new("/tmp/Report.DOCX")), ".docx");
        assert_eq!(extension_of(Path::new("/tmp/README")), "");
    }

    #[test]
    fn test_size_kb_two_decimals() {
        assert_eq!(size_kb(1536), 1.5);
        assert_eq!(size_kb(0), 0.0);
        assert_eq!(size_kb(1000), 0.98);
    }

    #[test]
    fn test_error_row_truncates_message() {
        let long = "x".repeat(500);
        let row = ClassificationResult::stat_error_row(Path::new("/nope/gone.txt"), &long, 3);
        assert_eq!(row.error_message.chars().count(), MAX_ERROR_MESSAGE_CHARS);
        assert_eq!(row.status, FileStatus::Error);
        assert_eq!(row.confidence_score, 0);
        assert!(!row.contextual_insights.is_empty());
    }

    #[test]
    fn test_older_than_years() {
        let old = FileDescriptor {
            path: PathBuf::from("/tmp/old.txt"),
            size_bytes: 10,
            modified_time: SystemTime::now() - Duration::from_secs(7 * 365 * 24 * 3600),
            extension: ".txt".to_string(),
        };
        assert!(old.older_than_years(6));
        assert!(!old.older_than_years(8));
    }
}
