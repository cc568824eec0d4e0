use crate::citygml::{get_attribute_if_present, Document};
use crate::error::FileError;
use crate::export::export_template;
use log::warn;
use std::path::{Path, PathBuf};

pub const TEMPLATE_HEADER: [&str; 4] = ["BuildingID", "yearOfConstruction", "function", "comment"];
pub const TEMPLATE_TYPES: [&str; 4] = ["attribute_type", "bldg", "bldg", "gen"];
pub const TEMPLATE_EXAMPLE: [&str; 4] = ["building123456789", "1234", "1010", "Fake building"];

/// Scaffold rows for a document without companion table: the three fixed
/// rows, then one row per Building in document order.
#[must_use]
pub fn template_rows(document: &Document) -> Vec<[String; 4]> {
    let fixed = [TEMPLATE_HEADER, TEMPLATE_TYPES, TEMPLATE_EXAMPLE]
        .into_iter()
        .map(|row| row.map(str::to_string));

    let buildings = document.buildings().map(|building| {
        let existing = |attribute: &str| {
            get_attribute_if_present(building, attribute)
                .and_then(|e| e.text.clone())
                .unwrap_or_default()
        };
        [
            building.gml_id().unwrap_or_default().to_string(),
            existing("yearOfConstruction"),
            existing("function"),
            String::new(),
        ]
    });

    fixed.chain(buildings).collect()
}

/// Writes `<document>.csv` next to the document and returns its path.
pub fn save_csv_template(gml_path: &Path) -> Result<PathBuf, FileError> {
    let document = Document::open(gml_path)?;
    let csv_path = gml_path.with_extension("csv");
    export_template(&template_rows(&document), &csv_path)?;
    warn!("{} has been written as template.", csv_path.display());
    Ok(csv_path)
}
