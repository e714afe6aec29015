use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Bounded plain-text extraction: up to `max_lines` lines and `max_chars`
/// characters, decoded lossily. Any read failure degrades to the empty
/// string; empty content is itself meaningful input to the scorer.
pub fn read_content(path: &Path, max_lines: usize, max_chars: usize) -> String {
    // A UTF-8 char is at most 4 bytes.
    let byte_budget = (max_chars as u64).saturating_mul(4);

    let mut buffer = Vec::new();
    match File::open(path) {
        Ok(file) => {
            if let Err(err) = file.take(byte_budget).read_to_end(&mut buffer) {
                warn!("Could not read file {}: {}", path.display(), err);
                return String::new();
            }
        }
        Err(err) => {
            warn!("Could not open file {}: {}", path.display(), err);
            return String::new();
        }
    }

    let text = String::from_utf8_lossy(&buffer);
    let mut content = text
        .lines()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n");
    if content.chars().count() > max_chars {
        content = content.chars().take(max_chars).collect();
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_empty_content() {
        assert_eq!(read_content(Path::new("/no/such/file.txt"), 100, 4000), "");
    }

    #[test]
    fn test_line_budget_applied() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("lines.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        for i in 0..10 {
            writeln!(file, "line {}", i).unwrap();
        }
        let content = read_content(&path, 3, 4000);
        assert_eq!(content, "line 0\nline 1\nline 2");
    }

    #[test]
    fn test_char_budget_applied() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("chars.txt");
        std::fs::write(&path, "a".repeat(500)).unwrap();
        let content = read_content(&path, 100, 64);
        assert_eq!(content.chars().count(), 64);
    }

    #[test]
    fn test_binary_content_decodes_lossily() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("blob.bin");
        std::fs::write(&path, [0xFFu8, 0xFE, 0x00, 0x41]).unwrap();
        let content = read_content(&path, 100, 4000);
        assert!(content.contains('\u{FFFD}'));
    }
}
