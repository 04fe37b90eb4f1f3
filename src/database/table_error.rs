use std::fmt::Display;

use crate::database::DataType;

/// Raised when a table (or a result context converted into one) would break
/// the column invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    LengthMismatch { column: String, expected: usize, got: usize },
    TypeMismatch { column: String, ty: DataType, row: usize },
    NotAnArray,
    NotAnObject { row: usize },
    UnsupportedValue { column: String, row: usize },
}

impl Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::LengthMismatch { column, expected, got } => {
                write!(f, "TableError: column {} had {} rows, expected {}", column, got, expected)
            }
            TableError::TypeMismatch { column, ty, row } => {
                write!(f, "TableError: value at row {} of column {} is not {}", row, column, ty)
            }
            TableError::NotAnArray => write!(f, "TableError: rows must be a JSON array"),
            TableError::NotAnObject { row } => write!(f, "TableError: row {} is not a JSON object", row),
            TableError::UnsupportedValue { column, row } => {
                write!(f, "TableError: nested value at row {} of column {}", row, column)
            }
        }
    }
}

impl std::error::Error for TableError {}
