pub mod csv;
pub mod json;

pub use crate::error::ExportError;
pub use self::csv::export_template;
pub use json::export_report;
