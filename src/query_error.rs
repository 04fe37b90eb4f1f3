use std::fmt::Display;

use crate::{
    parser::{LexError, ParseError, analyzer::CompileError},
    runtime::RuntimeError,
};

/// First error raised by any stage of a query. Each stage fails fast, so a
/// query yields either a complete result or exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    Lex(LexError),
    Parse(ParseError),
    Compile(CompileError),
    Runtime(RuntimeError),
}

impl QueryError {
    /// Name of the stage that failed.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Lex(_) => "LexError",
            QueryError::Parse(_) => "ParseError",
            QueryError::Compile(_) => "CompileError",
            QueryError::Runtime(_) => "RuntimeError",
        }
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::Lex(e) => write!(f, "{}", e),
            QueryError::Parse(e) => write!(f, "{}", e),
            QueryError::Compile(e) => write!(f, "{}", e),
            QueryError::Runtime(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Lex(e) => Some(e),
            QueryError::Parse(e) => Some(e),
            QueryError::Compile(e) => Some(e),
            QueryError::Runtime(e) => Some(e),
        }
    }
}

impl From<LexError> for QueryError {
    fn from(e: LexError) -> Self {
        QueryError::Lex(e)
    }
}

impl From<ParseError> for QueryError {
    fn from(e: ParseError) -> Self {
        QueryError::Parse(e)
    }
}

impl From<CompileError> for QueryError {
    fn from(e: CompileError) -> Self {
        QueryError::Compile(e)
    }
}

impl From<RuntimeError> for QueryError {
    fn from(e: RuntimeError) -> Self {
        QueryError::Runtime(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_the_failing_stage() {
        let err: QueryError = RuntimeError::new("boom").into();
        assert_eq!(err.kind(), "RuntimeError");
        assert_eq!(err.to_string(), "RuntimeError: boom");

        let err: QueryError = CompileError::UnknownColumn("nope".into()).into();
        assert_eq!(err.kind(), "CompileError");
        assert!(err.to_string().contains("nope"));
    }
}
