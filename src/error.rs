//! Error types for CityGML preparation tools.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading a companion spreadsheet.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the spreadsheet from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The CSV content is malformed.
    #[error("CSV read failed: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// The XLS/XLSX/ODS workbook could not be opened or read.
    #[error("workbook read failed: {source}")]
    Workbook {
        #[from]
        source: calamine::Error,
    },

    /// The workbook has no worksheet to read.
    #[error("workbook '{path}' has no worksheet")]
    EmptyWorkbook { path: PathBuf },

    /// The header row has no `BuildingID` column.
    #[error("no 'BuildingID' column found in '{path}'")]
    MissingIdColumn { path: PathBuf },

    /// Several rows share the same building ID.
    #[error("multiple rows with same building IDs are not allowed:\n{}", .ids.join("\n"))]
    DuplicateIds { ids: Vec<String> },

    /// Some column names do not start with a lowercase character.
    #[error(
        "attributes should all start with a lowercase character, even comments should belong to a defined attribute column:\n{}",
        .columns.join("\n")
    )]
    NonLowercaseColumns { columns: Vec<String> },
}

/// Errors that can occur when reading or writing CityGML documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read the document from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The XML is malformed.
    #[error("invalid XML: {source}")]
    Xml {
        #[from]
        source: quick_xml::Error,
    },

    /// The document has no root element.
    #[error("document has no root element")]
    NoRoot,

    /// Failed to write the document to disk.
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Two documents bind the same prefix to different namespaces.
    #[error("prefix '{prefix}' is bound to both '{first}' and '{second}'")]
    NamespaceConflict {
        prefix: String,
        first: String,
        second: String,
    },
}

/// Errors that can occur when exporting templates and reports.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}

/// Errors that abort a single input file but not the batch.
#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Export(#[from] ExportError),

    /// More than one spreadsheet format exists for the same document.
    #[error("too many spreadsheets have been found for '{path}': {}", .formats.join(", "))]
    AmbiguousSpreadsheets {
        path: PathBuf,
        formats: Vec<String>,
    },
}

/// Errors that abort a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input folder does not exist.
    #[error("'{path}' folder does not exist")]
    MissingInputFolder { path: PathBuf },

    /// The output folder could not be created.
    #[error("failed to create folder '{path}': {source}")]
    CreateOutputFolder {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The input folder could not be listed.
    #[error("failed to read folder '{path}': {source}")]
    ReadFolder {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Merging needs at least two documents.
    #[error("at least two GML files are required for merging, got {count}")]
    NotEnoughFiles { count: usize },

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
