use std::fmt::Display;

use crate::database::TableError;

/// Internal inconsistency found while evaluating an already compiled query.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub message: String,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn err<T>(self) -> Result<T, RuntimeError> {
        Err(self)
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RuntimeError: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

impl From<TableError> for RuntimeError {
    fn from(err: TableError) -> Self {
        RuntimeError::new(err.to_string())
    }
}
