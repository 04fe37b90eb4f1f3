pub mod lex_error;
pub use lex_error::*;

pub mod lexer;
pub use lexer::*;

pub mod ast;

pub mod parse_error;
pub use parse_error::*;

pub mod query_parser;
pub use query_parser::*;

pub mod analyzer;
