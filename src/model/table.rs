use super::{AttributeKind, CellValue};
use std::collections::HashMap;

/// Index value of the row classifying every attribute column.
pub const ATTRIBUTE_TYPE_ROW: &str = "attribute_type";

/// Header of the column holding building identifiers.
pub const ID_COLUMN: &str = "BuildingID";

/// A spreadsheet as read from disk, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// One spreadsheet row describing a building or building part.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingRecord {
    pub id: String,
    pub values: HashMap<String, CellValue>,
}

impl BuildingRecord {
    #[must_use]
    pub fn value(&self, attribute: &str) -> &CellValue {
        self.values.get(attribute).unwrap_or(&CellValue::Null)
    }
}

/// Attribute name to kind, as declared by the `attribute_type` row.
pub type Classification = HashMap<String, AttributeKind>;

/// A validated companion table indexed by building ID.
#[derive(Debug, Clone, Default)]
pub struct BuildingTable {
    pub attributes: Vec<String>,
    pub classification: Classification,
    records: HashMap<String, BuildingRecord>,
}

impl BuildingTable {
    #[must_use]
    pub fn new(attributes: Vec<String>, classification: Classification) -> Self {
        Self {
            attributes,
            classification,
            records: HashMap::new(),
        }
    }

    /// Adds a record, replacing any record with the same ID.
    pub fn insert(&mut self, record: BuildingRecord) {
        self.records.insert(record.id.clone(), record);
    }

    /// Builder-style variant of [`BuildingTable::insert`].
    #[must_use]
    pub fn with_record<I, K>(mut self, id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        self.insert(BuildingRecord {
            id: id.to_string(),
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        });
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BuildingRecord> {
        self.records.get(id)
    }

    #[must_use]
    pub fn kind_of(&self, attribute: &str) -> Option<AttributeKind> {
        self.classification.get(attribute).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Coerces a `BuildingID` cell to its string key.
///
/// Numeric IDs lose an integral fractional part so that `100`, `"100"` and
/// `100.0` all map to `"100"`. Returns `None` for null and empty cells.
#[must_use]
pub fn normalize_id(cell: &CellValue) -> Option<String> {
    if cell.is_blank() {
        return None;
    }
    match cell {
        CellValue::Text(s) => {
            let is_integral_decimal = s.contains('.')
                && s.parse::<f64>()
                    .is_ok_and(|f| f.is_finite() && f.fract() == 0.0);
            if is_integral_decimal {
                s.parse::<f64>()
                    .ok()
                    .map(|f| CellValue::Float(f).to_string())
            } else {
                Some(s.clone())
            }
        }
        other => Some(other.to_string()),
    }
}
