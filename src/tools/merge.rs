use crate::citygml::{indent, list_citygml_files, save, Document, Node};
use crate::error::{BatchError, DocumentError};
use crate::inject::batch::create_dir_if_needed;
use log::info;
use std::path::{Path, PathBuf};

/// Appends the top-level elements of `other` to the root of `base`.
///
/// Namespace declarations missing from the base root are copied over first.
///
/// # Errors
///
/// Returns [`DocumentError::NamespaceConflict`] when both roots bind the same
/// prefix, or the default namespace, to different URIs. `base` is left
/// unchanged in that case.
pub fn merge_into(base: &mut Document, other: Document) -> Result<(), DocumentError> {
    let mut missing = Vec::new();
    for declaration in other
        .root
        .attributes
        .iter()
        .filter(|a| a.name == "xmlns" || a.name.starts_with("xmlns:"))
    {
        match base.root.attributes.iter().find(|a| a.name == declaration.name) {
            Some(existing) if existing.value != declaration.value => {
                return Err(DocumentError::NamespaceConflict {
                    prefix: declaration.name.trim_start_matches("xmlns").trim_start_matches(':').to_string(),
                    first: existing.value.clone(),
                    second: declaration.value.clone(),
                });
            }
            Some(_) => {}
            None => missing.push(declaration.clone()),
        }
    }
    base.root.attributes.extend(missing);

    base.root.children.extend(
        other
            .root
            .children
            .into_iter()
            .filter(|node| matches!(node, Node::Element(_))),
    );
    Ok(())
}

/// Parses every path and merges them into the first document.
pub fn merge_documents(paths: &[PathBuf]) -> Result<Document, BatchError> {
    let [first, rest @ ..] = paths else {
        return Err(BatchError::NotEnoughFiles { count: 0 });
    };
    if rest.is_empty() {
        return Err(BatchError::NotEnoughFiles { count: 1 });
    }

    let mut base = Document::open(first)?;
    for path in rest {
        info!("Merging {}", path.display());
        merge_into(&mut base, Document::open(path)?)?;
    }
    Ok(base)
}

/// Merges `inputs` into `output`. A folder among the inputs stands for the
/// CityGML files it contains.
pub fn merge_files(inputs: &[PathBuf], output: &Path) -> Result<usize, BatchError> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let files = list_citygml_files(input).map_err(|source| BatchError::ReadFolder {
                path: input.clone(),
                source,
            })?;
            paths.extend(files);
        } else {
            paths.push(input.clone());
        }
    }

    let mut merged = merge_documents(&paths)?;
    indent(&mut merged.root);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_if_needed(parent)?;
    }
    save(&merged, output)?;
    info!("Merged GML files saved to {}", output.display());
    Ok(paths.len())
}
