use crate::config::RetentionPolicy;
use crate::eligibility::{self, EarlyVerdict};
use crate::model::{Determination, FileDescriptor, RunMode};

mod walk;

pub use walk::scan_directory;

/// Dry-run summary of a descriptor set by eligibility category.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryCounts {
    pub destroy: usize,
    pub analyze: usize,
    pub skip: usize,
    pub total: usize,
}

/// Count how the policy would treat each descriptor, without reading any
/// content. Delegates to the eligibility policy rather than re-deriving the
/// rules.
pub fn count_categories(
    descriptors: &[FileDescriptor],
    policy: &RetentionPolicy,
) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for descriptor in descriptors {
        counts.total += 1;
        match eligibility::classify_eligibility(descriptor, policy, RunMode::Classification) {
            Some(EarlyVerdict {
                determination: Determination::Destroy,
                ..
            }) => counts.destroy += 1,
            Some(_) => counts.skip += 1,
            None => counts.analyze += 1,
        }
    }
    counts
}
