use crate::error::ExportError;
use std::fs::File;
use std::path::Path;

/// Writes template rows as `;`-separated CSV.
pub fn export_template<P: AsRef<Path>, R: AsRef<[String]>>(
    rows: &[R],
    path: P,
) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_writer(file);

    for row in rows {
        writer.write_record(row.as_ref())?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_are_semicolon_separated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("district.csv");
        let rows = vec![
            ["BuildingID", "function", "comment"].map(str::to_string),
            ["b1", "1010", ""].map(str::to_string),
            ["b2", "", "a;b"].map(str::to_string),
        ];

        export_template(&rows, &path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "BuildingID;function;comment\nb1;1010;\nb2;;\"a;b\"\n"
        );
    }
}
