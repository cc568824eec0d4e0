use crate::citygml::{list_citygml_files, save, Document, Element, KindRegistry};
use crate::error::{BatchError, FileError};
use crate::inject::batch::create_dir_if_needed;
use log::{error, info};
use std::path::Path;

/// Strips the usage prefix of a `<prefix>_<code>` function code.
///
/// Returns the second `_`-separated fragment, or `None` when the code has no
/// underscore.
#[must_use]
pub fn strip_use_prefix(code: &str) -> Option<&str> {
    let mut fragments = code.split('_');
    fragments.next();
    fragments.next()
}

/// Rewrites the `function` codes of every Building, returning how many
/// changed.
pub fn rewrite_functions(document: &mut Document) -> usize {
    let registry = document.registry();
    let mut changed = 0;
    registry.buildings_mut(&mut document.root, &mut |building| {
        rewrite_below(building, &registry, &mut changed);
    });
    changed
}

fn rewrite_below(element: &mut Element, registry: &KindRegistry, changed: &mut usize) {
    for child in element.elements_mut() {
        let is_function = child.local_name() == "function"
            && child
                .namespace
                .as_deref()
                .is_some_and(|ns| registry.is_building_namespace(ns));
        if is_function {
            let stripped = child
                .text
                .as_deref()
                .and_then(strip_use_prefix)
                .map(str::to_string);
            if let Some(code) = stripped {
                child.text = Some(code);
                *changed += 1;
            }
        }
        rewrite_below(child, registry, changed);
    }
}

/// Rewrites usage codes in every CityGML file of `input_folder` and writes
/// the documents to `output_folder`. Returns the number of files written.
pub fn change_use_type(input_folder: &Path, output_folder: &Path) -> Result<usize, BatchError> {
    if !input_folder.is_dir() {
        return Err(BatchError::MissingInputFolder {
            path: input_folder.to_path_buf(),
        });
    }
    create_dir_if_needed(output_folder)?;

    let files = list_citygml_files(input_folder).map_err(|source| BatchError::ReadFolder {
        path: input_folder.to_path_buf(),
        source,
    })?;

    let mut written = 0;
    for path in files {
        match change_file(&path, output_folder) {
            Ok(changed) => {
                info!("{}: {changed} function codes rewritten.", path.display());
                written += 1;
            }
            Err(e) => error!("{}: {e}", path.display()),
        }
    }
    Ok(written)
}

fn change_file(path: &Path, output_folder: &Path) -> Result<usize, FileError> {
    let mut document = Document::open(path)?;
    let changed = rewrite_functions(&mut document);
    let output = match path.file_name() {
        Some(name) => output_folder.join(name),
        None => output_folder.join("output.gml"),
    };
    save(&document, output)?;
    Ok(changed)
}
