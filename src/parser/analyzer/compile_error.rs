use std::fmt::Display;

use crate::database::DataType;

#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    UnknownTable(String),
    UnknownColumn(String),
    /// Short name present under two or more qualifiers.
    AmbiguousColumn(String),
    FunctionNotFound(String),
    FunctionArgMismatch { name: String, expected: String, got: Vec<DataType> },
    DistinctNotSupported(String),
    DuplicateAlias(String),
    /// Two sources of a join expose the same qualified column.
    DuplicateColumn(String),
    InvalidGroupBy(String),
    UnexpectedAggregate(String),
    IncompatibleUnion { column: String, left: DataType, right: DataType },
    NonBooleanPredicate(DataType),
    MisplacedWildcard,
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompileError: ")?;
        match self {
            CompileError::UnknownTable(name) => write!(f, "table not found: {}", name),
            CompileError::UnknownColumn(name) => write!(f, "field not found: {}", name),
            CompileError::AmbiguousColumn(name) => write!(f, "ambiguous field: {}", name),
            CompileError::FunctionNotFound(name) => write!(f, "unknown function: {}", name),
            CompileError::FunctionArgMismatch { name, expected, got } => {
                let got: Vec<String> = got.iter().map(|t| t.to_string()).collect();
                write!(f, "invalid arguments for {}: expected {}, got ({})", name, expected, got.join(", "))
            }
            CompileError::DistinctNotSupported(name) => write!(f, "DISTINCT is not supported by {}", name),
            CompileError::DuplicateAlias(alias) => write!(f, "ambiguous column name {}", alias),
            CompileError::DuplicateColumn(name) => write!(f, "column {} appears on both sides of a join", name),
            CompileError::InvalidGroupBy(name) => {
                write!(f, "GROUP BY {} is neither a source column nor a select alias", name)
            }
            CompileError::UnexpectedAggregate(name) => write!(f, "unexpected aggregate function {}", name),
            CompileError::IncompatibleUnion { column, left, right } => {
                write!(f, "incompatible types when performing union on field {}: {} vs. {}", column, left, right)
            }
            CompileError::NonBooleanPredicate(ty) => write!(f, "WHERE must be BOOLEAN, got {}", ty),
            CompileError::MisplacedWildcard => write!(f, "'*' is only allowed as a select field or in COUNT(*)"),
        }
    }
}

impl std::error::Error for CompileError {}
