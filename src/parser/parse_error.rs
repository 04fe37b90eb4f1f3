use std::fmt::Display;

use crate::parser::QueryParser;

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    /// Byte offset of the offending token, or the input length at end of input.
    pub position: usize,
    /// Offending token text; `None` at end of input.
    pub token: Option<String>,
}

impl ParseError {
    pub fn new(message: &str, parser: &QueryParser) -> Self {
        let current = parser.current();
        Self {
            message: message.to_string(),
            position: current.map(|t| t.position).unwrap_or_else(|| parser.end_position()),
            token: current.map(|t| t.text.clone()),
        }
    }

    pub fn err<T>(self) -> Result<T, ParseError> {
        Err(self)
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.token {
            Some(token) => write!(f, "ParseError: {}\n  at [{}] -> '{}'", self.message, self.position, token),
            None => write!(f, "ParseError: {}\n  at [{}] -> end of input", self.message, self.position),
        }
    }
}

impl std::error::Error for ParseError {}
