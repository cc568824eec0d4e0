use crate::error::LoadError;
use crate::model::{CellValue, RawTable};
use std::path::Path;

/// Reads a CSV companion table.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<RawTable, LoadError> {
    let path_ref = path.as_ref();
    let content = std::fs::read_to_string(path_ref).map_err(|source| LoadError::FileRead {
        path: path_ref.to_path_buf(),
        source,
    })?;

    Ok(parse_csv(&content)?)
}

/// Parses CSV text, sniffing `;` or `,` from the header line.
pub fn parse_csv(content: &str) -> Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .flexible(true)
        .from_reader(content.as_bytes());

    let header = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(parse_cell).collect());
    }

    Ok(RawTable { header, rows })
}

fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    }
}

/// Field values read as missing, matching the default NA markers of
/// dataframe CSV readers.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn parse_cell(field: &str) -> CellValue {
    if NA_MARKERS.contains(&field) {
        CellValue::Null
    } else {
        CellValue::Text(field.to_string())
    }
}
