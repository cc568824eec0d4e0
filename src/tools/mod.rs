//! Peripheral dataset tools.

pub mod merge;
pub mod use_type;

pub use merge::{merge_documents, merge_files, merge_into};
pub use use_type::{change_use_type, rewrite_functions, strip_use_prefix};
