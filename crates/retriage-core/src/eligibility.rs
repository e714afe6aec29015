use crate::config::RetentionPolicy;
use crate::model::{Determination, FileDescriptor, FileStatus, RunMode};

/// Verdict reached from metadata alone, before any content is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarlyVerdict {
    pub determination: Determination,
    pub confidence: u8,
    pub status: FileStatus,
    pub reason: String,
}

/// Metadata-only policy check. First match wins and short-circuits all
/// further analysis; `None` means the file requires content analysis.
///
/// Age is evaluated before type so that old files of any extension are
/// destroyed without wasting extraction effort. `LastModified` mode is a
/// metadata-only sweep: once age and type checks pass, the file is skipped
/// without reading content.
pub fn classify_eligibility(
    descriptor: &FileDescriptor,
    policy: &RetentionPolicy,
    run_mode: RunMode,
) -> Option<EarlyVerdict> {
    if descriptor.older_than_years(policy.age_threshold_years) {
        return Some(EarlyVerdict {
            determination: Determination::Destroy,
            confidence: 100,
            status: FileStatus::Success,
            reason: format!(
                "Older than {} years - automatic destroy",
                policy.age_threshold_years
            ),
        });
    }

    if policy.exclude_extensions.contains(&descriptor.extension) {
        return Some(EarlyVerdict {
            determination: Determination::Na,
            confidence: 100,
            status: FileStatus::Skipped,
            reason: format!("Excluded file type: {}", descriptor.extension),
        });
    }

    if !policy.include_extensions.contains(&descriptor.extension) {
        return Some(EarlyVerdict {
            determination: Determination::Na,
            confidence: 100,
            status: FileStatus::Skipped,
            reason: format!("Unsupported file type: {}", descriptor.extension),
        });
    }

    if run_mode == RunMode::LastModified {
        return Some(EarlyVerdict {
            determination: Determination::Na,
            confidence: 100,
            status: FileStatus::Skipped,
            reason: format!("File newer than {} years", policy.age_threshold_years),
        });
    }

    None
}
