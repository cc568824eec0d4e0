pub mod attribute;
pub mod report;
pub mod table;

pub use attribute::{AttributeKind, CellValue};
pub use report::{BatchReport, FileOutcome, FileReport};
pub use table::{BuildingRecord, BuildingTable, Classification, RawTable};
