use crate::error::Error;
use crate::model::FileDescriptor;
use glob::Pattern;
use std::path::Path;
use tracing::{error, warn};
use walkdir::{DirEntry, WalkDir};

/// Recursive traversal producing a descriptor per regular file, in directory
/// order. Skips hidden entries, office lock files (`~$`), symlinks, and
/// anything matching an ignore glob. Per-entry errors are logged and the
/// entry skipped; only an unusable root is an error.
pub fn scan_directory(root: &Path, ignore_globs: &[String]) -> Result<Vec<FileDescriptor>, Error> {
    if !root.is_dir() {
        return Err(Error::Other(format!(
            "Path is not a directory: {}",
            root.display()
        )));
    }

    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                error!("Invalid glob pattern '{}': {}", glob, err);
                None
            }
        })
        .collect();

    let mut descriptors = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_filtered(entry, &ignore_patterns));

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Error reading directory entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match FileDescriptor::from_path(entry.path()) {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(err) => {
                warn!("Error reading metadata for {}: {}", entry.path().display(), err);
            }
        }
    }

    Ok(descriptors)
}

fn is_filtered(entry: &DirEntry, ignore_patterns: &[Pattern]) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') || name.starts_with("~$") {
        return true;
    }
    ignore_patterns
        .iter()
        .any(|pattern| pattern.matches_path(entry.path()))
}
