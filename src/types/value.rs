//! Table cell values

use super::data_type::DataType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A row of cells, positionally matching its table's schema.
pub type Row = Vec<Value>;

/// A single typed cell. The null/absent concept is represented by the
/// type-specific zero: `""`, `0`, `0.0`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Int(i64),
    Real(f64),
}

impl Value {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// The type-specific zero for a column type.
    pub fn default_for(data_type: DataType) -> Self {
        match data_type {
            DataType::Text => Value::Text(String::new()),
            DataType::Int => Value::Int(0),
            DataType::Real => Value::Real(0.0),
        }
    }

    /// Get the data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Text(_) => DataType::Text,
            Value::Int(_) => DataType::Int,
            Value::Real(_) => DataType::Real,
        }
    }

    /// True iff the value is the type-specific zero.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::Int(n) => *n == 0,
            Value::Real(n) => *n == 0.0,
        }
    }

    /// Boolean interpretation: nonzero numbers and non-empty text are true.
    pub fn is_truthy(&self) -> bool {
        !self.is_blank()
    }

    /// Numeric interpretation, if the value is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Real(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// The plain-text rendering used by APPEND and user-facing payloads.
    /// REAL keeps its natural shortest form here; the one-fractional-digit
    /// rendering belongs to the CSV codec.
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Real(n) => n.to_string(),
        }
    }

    /// Coerces this value to a column type. Used when a rule result is
    /// written into a typed cell.
    pub fn coerce(self, data_type: DataType) -> Result<Value> {
        match (self, data_type) {
            (v @ Value::Text(_), DataType::Text) => Ok(v),
            (v @ Value::Int(_), DataType::Int) => Ok(v),
            (v @ Value::Real(_), DataType::Real) => Ok(v),
            (Value::Int(n), DataType::Real) => Ok(Value::Real(n as f64)),
            (Value::Real(n), DataType::Int) if n.fract() == 0.0 => Ok(Value::Int(n as i64)),
            (Value::Int(n), DataType::Text) => Ok(Value::Text(n.to_string())),
            (Value::Real(n), DataType::Text) => Ok(Value::Text(n.to_string())),
            (Value::Text(s), DataType::Int) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| Error::InvalidValue(format!("'{}' is not an INT", s))),
            (Value::Text(s), DataType::Real) => s
                .trim()
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|_| Error::InvalidValue(format!("'{}' is not a REAL", s))),
            (v, t) => Err(Error::TypeMismatch {
                expected: t.to_string(),
                found: v.data_type().to_string(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

// Nicer test output than the derived form.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "Text({:?})", s),
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Real(n) => write!(f, "Real({})", n),
        }
    }
}

impl Eq for Value {}

// Hash by bit pattern for REAL so values can key group and join maps.
impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Real(n) => n.to_bits().hash(state),
        }
    }
}
