//! Error types for the table engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Registry errors
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table already exists: {0}")]
    DuplicateTable(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column already exists: {0}")]
    DuplicateColumn(String),

    // Type errors
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    // Row ingress errors; carries every offending column so the caller sees
    // the full set at once.
    #[error("Validation failed for columns: {}", columns.join(", "))]
    ValidationFailure { columns: Vec<String> },

    // Expression errors (parse and evaluation)
    #[error("Expression error: {0}")]
    ExpressionError(String),

    // Command surface errors
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // System errors. The message is kept instead of the source error so the
    // enum stays Clone.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
