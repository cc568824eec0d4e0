//! Attribute injection from companion spreadsheets.

pub mod batch;
pub mod reconcile;
pub mod template;

pub use batch::{inject_attributes, process, process_file};
pub use reconcile::{ReconcileStats, Reconciler};
pub use template::{save_csv_template, template_rows};
