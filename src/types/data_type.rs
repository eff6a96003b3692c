//! Column data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three cell types a column can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    #[serde(alias = "Text", alias = "text")]
    Text,
    #[serde(alias = "Int", alias = "int")]
    Int,
    #[serde(alias = "Real", alias = "real")]
    Real,
}

impl DataType {
    /// Parses a type name from a schema header. Matching is case-insensitive
    /// and unknown names fall back to TEXT, so a header written by hand never
    /// fails to load.
    pub fn from_header(name: &str) -> DataType {
        match name.trim().to_uppercase().as_str() {
            "INT" => DataType::Int,
            "REAL" => DataType::Real,
            _ => DataType::Text,
        }
    }

    /// True for INT and REAL.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Real)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Text => write!(f, "TEXT"),
            DataType::Int => write!(f, "INT"),
            DataType::Real => write!(f, "REAL"),
        }
    }
}
