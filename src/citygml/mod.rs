//! Owned, mutable CityGML document model.

pub mod document;
pub mod namespace;
pub mod tree;
pub mod writer;

pub use crate::error::DocumentError;
pub use document::{get_attribute_if_present, Document};
pub use namespace::{ElementKind, KindRegistry, Namespaces, GML32_NS, GML_NS};
pub use tree::{Attribute, Element, Node};
pub use writer::{indent, save};

use std::path::{Path, PathBuf};

/// `*.gml` and `*.xml` files directly inside `folder`, sorted by name.
pub fn list_citygml_files(folder: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        let is_citygml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gml") || e.eq_ignore_ascii_case("xml"));
        if is_citygml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
