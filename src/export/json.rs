use crate::error::ExportError;
use crate::model::BatchReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn export_report<P: AsRef<Path>>(report: &BatchReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let json = serde_json::to_string_pretty(report)?;

    let mut file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileOutcome;
    use std::path::PathBuf;

    #[test]
    fn outcomes_are_tagged_by_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut report = BatchReport::new(PathBuf::from("input"), PathBuf::from("output"));
        report.record(
            PathBuf::from("input/a.gml"),
            FileOutcome::Failed {
                reason: "duplicate ids".into(),
            },
        );

        export_report(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["files"][0]["outcome"]["status"], "failed");
        assert_eq!(value["files"][0]["outcome"]["reason"], "duplicate ids");
        assert_eq!(value["input_folder"], "input");
    }
}
