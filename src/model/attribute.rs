use serde::Serialize;
use std::fmt;

/// How an attribute column is written into a building element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeKind {
    /// Typed element of the building schema, appended as last child.
    Structured,
    /// `stringAttribute` of the generics schema, inserted as first child.
    Generic,
}

impl AttributeKind {
    /// Parses an `attribute_type` tag (`bldg`, `building`, `gen`, `generic`).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "bldg" | "building" => Some(Self::Structured),
            "gen" | "generic" => Some(Self::Generic),
            _ => None,
        }
    }
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    /// True for missing cells and NaN.
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// True for null cells and empty text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            other => other.is_null(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
        }
    }
}
