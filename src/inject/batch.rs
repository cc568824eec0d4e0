use super::reconcile::Reconciler;
use super::template::save_csv_template;
use crate::citygml::{indent, list_citygml_files, save, Document};
use crate::error::{BatchError, FileError};
use crate::model::{BatchReport, BuildingTable, FileOutcome};
use crate::spreadsheet::{find_companion_tables, load_table, SpreadsheetFormat};
use log::{error, info, warn};
use std::path::Path;
use std::time::Instant;

pub(crate) fn create_dir_if_needed(path: &Path) -> Result<(), BatchError> {
    if !path.exists() {
        info!("Creating '{}' folder.", path.display());
        std::fs::create_dir_all(path).map_err(|source| BatchError::CreateOutputFolder {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Injects spreadsheet attributes into every CityGML file of `input_folder`.
///
/// A file that fails is logged and recorded in the report; the batch goes on
/// with the next file.
///
/// # Errors
///
/// Returns [`BatchError::MissingInputFolder`] before anything is written when
/// the input folder does not exist.
pub fn inject_attributes(input_folder: &Path, output_folder: &Path) -> Result<BatchReport, BatchError> {
    if !input_folder.is_dir() {
        return Err(BatchError::MissingInputFolder {
            path: input_folder.to_path_buf(),
        });
    }
    info!("# Parsing every gml file inside '{}'", input_folder.display());
    create_dir_if_needed(output_folder)?;

    let files = list_citygml_files(input_folder).map_err(|source| BatchError::ReadFolder {
        path: input_folder.to_path_buf(),
        source,
    })?;

    let start = Instant::now();
    let mut report = BatchReport::new(input_folder.to_path_buf(), output_folder.to_path_buf());

    for gml_path in files {
        let outcome = match process_file(&gml_path, output_folder) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{}: {e}", gml_path.display());
                FileOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        report.record(gml_path, outcome);
    }

    info!(
        "Finished all gml files in {:.2} s.",
        start.elapsed().as_secs_f64()
    );
    Ok(report)
}

/// Runs one document through table lookup, then injection or template
/// emission.
pub fn process_file(gml_path: &Path, output_folder: &Path) -> Result<FileOutcome, FileError> {
    match read_companion_table(gml_path)? {
        Some(table) => process(&table, gml_path, output_folder),
        None => {
            let formats: Vec<String> = SpreadsheetFormat::ALL.iter().map(ToString::to_string).collect();
            warn!(
                "No spreadsheet ({}) has been found for {}",
                formats.join(", "),
                gml_path.display()
            );
            let template = save_csv_template(gml_path)?;
            Ok(FileOutcome::TemplateWritten { template })
        }
    }
}

fn read_companion_table(gml_path: &Path) -> Result<Option<BuildingTable>, FileError> {
    match find_companion_tables(gml_path).as_slice() {
        [] => Ok(None),
        [(_, table_path)] => Ok(load_table(table_path)?),
        many => Err(FileError::AmbiguousSpreadsheets {
            path: gml_path.to_path_buf(),
            formats: many.iter().map(|(format, _)| format.to_string()).collect(),
        }),
    }
}

/// Reconciles one document against a loaded table and writes it to
/// `output_folder` under the same file name.
pub fn process(
    table: &BuildingTable,
    gml_path: &Path,
    output_folder: &Path,
) -> Result<FileOutcome, FileError> {
    info!("## Processing file {}...", gml_path.display());

    let mut document = Document::open(gml_path)?;
    let stats = Reconciler::new(&document, table).reconcile_document(&mut document);
    indent(&mut document.root);

    let output = match gml_path.file_name() {
        Some(name) => output_folder.join(name),
        None => output_folder.join("output.gml"),
    };
    save(&document, &output)?;

    info!("  Processed {} buildings.", stats.buildings);
    info!("  Finished writing {}.", output.display());

    Ok(FileOutcome::Injected {
        output,
        buildings: stats.buildings,
        added: stats.added,
        skipped: stats.skipped,
    })
}
