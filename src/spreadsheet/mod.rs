//! Companion spreadsheet loading and validation.

pub mod csv;
pub mod workbook;

pub use crate::error::LoadError;

use crate::model::table::{normalize_id, ATTRIBUTE_TYPE_ROW, ID_COLUMN};
use crate::model::{AttributeKind, BuildingRecord, BuildingTable, Classification, RawTable};
use log::warn;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported companion table formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xls,
    Xlsx,
    Ods,
    Csv,
}

impl SpreadsheetFormat {
    /// Every format, in lookup order.
    pub const ALL: [Self; 4] = [Self::Xls, Self::Xlsx, Self::Ods, Self::Csv];

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
            Self::Ods => "ods",
            Self::Csv => "csv",
        }
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == extension)
    }

    /// Reads the file into an unvalidated table.
    pub fn read(self, path: &Path) -> Result<RawTable, LoadError> {
        match self {
            Self::Csv => csv::read_csv(path),
            Self::Xls | Self::Xlsx | Self::Ods => workbook::read_workbook(path),
        }
    }
}

impl fmt::Display for SpreadsheetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Lists every spreadsheet sharing the document's base name.
#[must_use]
pub fn find_companion_tables(document: &Path) -> Vec<(SpreadsheetFormat, PathBuf)> {
    SpreadsheetFormat::ALL
        .into_iter()
        .map(|format| (format, document.with_extension(format.extension())))
        .filter(|(_, path)| path.is_file())
        .collect()
}

/// Loads and validates a companion table.
///
/// Returns `Ok(None)` when the file does not exist. This is not an error:
/// callers emit a template instead.
///
/// # Errors
///
/// Returns [`LoadError::DuplicateIds`] when building IDs repeat after string
/// coercion, and [`LoadError::NonLowercaseColumns`] when an attribute column
/// does not start with a lowercase character. No partial table is returned.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Option<BuildingTable>, LoadError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(None);
    }
    let Some(format) = SpreadsheetFormat::from_path(path) else {
        return Ok(None);
    };

    let raw = format.read(path)?;
    build_table(raw, path).map(Some)
}

/// Validates a raw table and indexes it by building ID.
pub fn build_table(raw: RawTable, path: &Path) -> Result<BuildingTable, LoadError> {
    let id_index = raw
        .header
        .iter()
        .position(|h| h == ID_COLUMN)
        .ok_or_else(|| LoadError::MissingIdColumn {
            path: path.to_path_buf(),
        })?;

    let attributes: Vec<(usize, String)> = raw
        .header
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != id_index)
        .map(|(i, name)| (i, name.clone()))
        .collect();

    let rows: Vec<(String, Vec<_>)> = raw
        .rows
        .into_iter()
        .filter_map(|row| {
            let id = row.get(id_index).and_then(normalize_id)?;
            Some((id, row))
        })
        .collect();

    let duplicates = duplicate_ids(rows.iter().map(|(id, _)| id.as_str()));
    if !duplicates.is_empty() {
        return Err(LoadError::DuplicateIds { ids: duplicates });
    }

    let non_lowercase: Vec<String> = attributes
        .iter()
        .filter(|(_, name)| !name.chars().next().is_some_and(char::is_lowercase))
        .map(|(_, name)| name.clone())
        .collect();
    if !non_lowercase.is_empty() {
        return Err(LoadError::NonLowercaseColumns {
            columns: non_lowercase,
        });
    }

    let mut classification = Classification::new();
    let mut has_type_row = false;
    let mut records = Vec::with_capacity(rows.len());

    for (id, mut row) in rows {
        if id == ATTRIBUTE_TYPE_ROW {
            has_type_row = true;
            for (index, name) in &attributes {
                let tag = row.get(*index).map(ToString::to_string).unwrap_or_default();
                match AttributeKind::from_tag(&tag) {
                    Some(kind) => {
                        classification.insert(name.clone(), kind);
                    }
                    None => warn!(
                        "{}: attribute '{name}' has unknown type '{tag}' and will be ignored",
                        path.display()
                    ),
                }
            }
            continue;
        }

        let mut values = HashMap::with_capacity(attributes.len());
        for (index, name) in &attributes {
            let cell = row
                .get_mut(*index)
                .map(std::mem::take)
                .unwrap_or_default();
            values.insert(name.clone(), cell);
        }
        records.push(BuildingRecord { id, values });
    }

    if !has_type_row {
        warn!(
            "{}: no '{ATTRIBUTE_TYPE_ROW}' row found, no attribute will be injected",
            path.display()
        );
    }

    let mut table = BuildingTable::new(
        attributes.into_iter().map(|(_, name)| name).collect(),
        classification,
    );
    for record in records {
        table.insert(record);
    }
    Ok(table)
}

fn duplicate_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen = Vec::new();
    for id in ids {
        let count = counts.entry(id).or_insert(0);
        if *count == 0 {
            first_seen.push(id);
        }
        *count += 1;
    }
    first_seen
        .into_iter()
        .filter(|id| counts.get(id).copied().unwrap_or(0) > 1)
        .map(str::to_string)
        .collect()
}
