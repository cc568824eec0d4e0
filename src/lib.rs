//! # CityGML Prep
//!
//! Batch tools preparing CityGML building datasets for energy simulation.
//!
//! ## Features
//!
//! - Inject building attributes from companion spreadsheets (CSV, XLS, XLSX, ODS)
//! - Write a CSV template when a document has no spreadsheet yet
//! - Strip usage prefixes from `bldg:function` codes
//! - Merge several CityGML documents into one
//! - Export a JSON report of a batch
//!
//! ## Example
//!
//! ```no_run
//! use citygml_prep::inject::inject_attributes;
//! use std::path::Path;
//!
//! let report = inject_attributes(Path::new("input"), Path::new("output")).expect("Failed to inject");
//! println!("Files: {}", report.files.len());
//! println!("Failed: {}", report.failed_count());
//! ```

pub mod citygml;
pub mod error;
pub mod export;
pub mod inject;
pub mod model;
pub mod spreadsheet;
pub mod tools;
