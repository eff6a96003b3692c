//! Value operations
//!
//! Arithmetic and comparison over cell values, keeping the Value type as
//! pure data. Operators follow the expression language's type rules: INT
//! stays INT until a REAL operand (or non-exact division) promotes the
//! result, `+` concatenates two TEXT values, and TEXT never compares with a
//! number.

use super::value::Value;
use crate::error::{Error, Result};
use std::cmp::Ordering;

fn type_mismatch(op: &str, left: &Value, right: &Value) -> Error {
    Error::TypeMismatch {
        expected: format!("operands suitable for '{}'", op),
        found: format!("{} and {}", left.data_type(), right.data_type()),
    }
}

/// Addition of numbers, or concatenation of two TEXT values.
pub fn add(left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => Ok(Value::Text(format!("{}{}", a, b))),
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(*b)
            .map(Value::Int)
            .ok_or_else(|| Error::InvalidValue("integer overflow".into())),
        (a, b) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Ok(Value::Real(x + y)),
            _ => Err(type_mismatch("+", left, right)),
        },
    }
}

pub fn subtract(left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_sub(*b)
            .map(Value::Int)
            .ok_or_else(|| Error::InvalidValue("integer overflow".into())),
        (a, b) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Ok(Value::Real(x - y)),
            _ => Err(type_mismatch("-", left, right)),
        },
    }
}

pub fn multiply(left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_mul(*b)
            .map(Value::Int)
            .ok_or_else(|| Error::InvalidValue("integer overflow".into())),
        (a, b) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Ok(Value::Real(x * y)),
            _ => Err(type_mismatch("*", left, right)),
        },
    }
}

/// Division. Dividing two INTs yields an INT when exact, otherwise REAL.
pub fn divide(left: &Value, right: &Value) -> Result<Value> {
    if right.as_number() == Some(0.0) {
        return Err(Error::InvalidValue("division by zero".into()));
    }
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => match a.checked_rem(*b) {
            Some(0) => a
                .checked_div(*b)
                .map(Value::Int)
                .ok_or_else(|| Error::InvalidValue("integer overflow".into())),
            Some(_) => Ok(Value::Real(*a as f64 / *b as f64)),
            None => Err(Error::InvalidValue("integer overflow".into())),
        },
        (a, b) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Ok(Value::Real(x / y)),
            _ => Err(type_mismatch("/", left, right)),
        },
    }
}

/// Exponentiation. An INT base with a non-negative INT exponent stays INT;
/// a negative exponent promotes to REAL.
pub fn exponentiate(left: &Value, right: &Value) -> Result<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) if *b >= 0 => u32::try_from(*b)
            .ok()
            .and_then(|e| a.checked_pow(e))
            .map(Value::Int)
            .ok_or_else(|| Error::InvalidValue("integer overflow".into())),
        (a, b) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Ok(Value::Real(x.powf(y))),
            _ => Err(type_mismatch("^", left, right)),
        },
    }
}

/// Numeric negation.
pub fn negate(value: &Value) -> Result<Value> {
    match value {
        Value::Int(n) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| Error::InvalidValue("integer overflow".into())),
        Value::Real(n) => Ok(Value::Real(-n)),
        Value::Text(_) => Err(Error::TypeMismatch {
            expected: "a number".into(),
            found: "TEXT".into(),
        }),
    }
}

/// Compares two values. INT and REAL compare numerically with each other;
/// TEXT compares lexicographically (Unicode codepoint order) with TEXT only.
pub fn compare(left: &Value, right: &Value) -> Result<Ordering> {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
        (a, b) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => Ok(x.partial_cmp(&y).unwrap_or(Ordering::Equal)),
            _ => Err(type_mismatch("comparison", left, right)),
        },
    }
}

/// Wraps a boolean as the language's 1/0 convention.
pub fn from_bool(b: bool) -> Value {
    Value::Int(if b { 1 } else { 0 })
}
