use crate::error::LoadError;
use crate::model::{CellValue, RawTable};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Reads the first worksheet of an XLS, XLSX or ODS workbook.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<RawTable, LoadError> {
    let path_ref = path.as_ref();
    let mut workbook = open_workbook_auto(path_ref)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::EmptyWorkbook {
            path: path_ref.to_path_buf(),
        })??;

    let mut rows = range.rows();
    let header = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_value(cell).to_string()).collect())
        .unwrap_or_default();
    let rows = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(RawTable { header, rows })
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}
