use crate::error::Error;
use crate::model::ClassificationResult;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Write results as flat CSV rows. Returns the row count.
pub fn write_csv(path: &Path, results: &[ClassificationResult]) -> Result<usize, Error> {
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    info!("Wrote {} result rows to {}", results.len(), path.display());
    Ok(results.len())
}

/// Write results as a JSON array. Returns the row count.
pub fn write_json(path: &Path, results: &[ClassificationResult]) -> Result<usize, Error> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), results)?;
    info!("Wrote {} result rows to {}", results.len(), path.display());
    Ok(results.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Determination, FileDescriptor, FileStatus};
    use std::path::PathBuf;
    use std::time::SystemTime;
    use tempfile::tempdir;

    fn sample_result() -> ClassificationResult {
        let descriptor = FileDescriptor {
            path: PathBuf::from("/data/memo.txt"),
            size_bytes: 2048,
            modified_time: SystemTime::now(),
            extension: ".txt".to_string(),
        };
        ClassificationResult::from_descriptor(
            &descriptor,
            Determination::Transitory,
            70,
            "The file includes the keyword 'temporary', indicating a transitory record."
                .to_string(),
            FileStatus::Success,
            12,
        )
    }

    #[test]
    fn test_csv_round_trip_header_and_row() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("results.csv");
        let rows = write_csv(&path, &[sample_result()]).unwrap();
        assert_eq!(rows, 1);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("file_name,extension,full_path,last_modified,size_kb"));
        assert!(written.contains("TRANSITORY"));
        assert!(written.contains("success"));
    }

    #[test]
    fn test_json_export_is_an_array() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("results.json");
        write_json(&path, &[sample_result()]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value.as_array().map(|a| a.len()), Some(1));
        assert_eq!(value[0]["model_determination"], "TRANSITORY");
        assert_eq!(value[0]["confidence_score"], 70);
    }
}
