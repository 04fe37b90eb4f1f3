use std::fmt::Display;

/// Raised when the input holds a character no token pattern matches.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub position: usize,
    pub text: String,
}

impl LexError {
    pub fn new(message: &str, position: usize, text: &str) -> Self {
        Self { message: message.to_string(), position, text: text.to_string() }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LexError: {}\n  at [{}] -> '{}'", self.message, self.position, self.text)
    }
}

impl std::error::Error for LexError {}
