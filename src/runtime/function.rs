use std::{fmt, ops::Deref, sync::Arc};

use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::analyzer::CompileError,
    runtime::RuntimeError,
};

/// A builtin scalar or aggregate operation.
/// One instance is registered per name; it is stateless (apart from injected
/// collaborators such as a clock) and shared between queries.
pub trait Function: Send + Sync {
    /// Canonical lowercase name ("sum", "+", "is null", ...).
    fn name(&self) -> &'static str;

    /// Aggregates read their arguments from the aggregate scope and fold them
    /// into one value per group.
    fn is_aggregate(&self) -> bool { false }

    /// Type check the argument types, returning the result type.
    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError>;

    /// Evaluate over argument columns, producing `num_rows` values.
    /// Scalars receive columns of `num_rows` values; aggregates receive the
    /// group's member rows and broadcast their single result.
    fn evaluate(&self, num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError>;
}

/// Shared handle to a registered function, carried by the typed AST.
#[derive(Clone)]
pub struct FunctionHandle(Arc<dyn Function>);

impl FunctionHandle {
    pub fn new<F: Function + 'static>(func: F) -> Self {
        Self(Arc::new(func))
    }
}

impl Deref for FunctionHandle {
    type Target = dyn Function;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for FunctionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.0.name())
    }
}

impl PartialEq for FunctionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.0.name() == other.0.name()
    }
}

/// Shared argument-count check.
pub fn expect_arity(name: &str, expected: &str, arg_types: &[DataType], count: usize) -> Result<(), CompileError> {
    if arg_types.len() == count {
        Ok(())
    } else {
        Err(CompileError::FunctionArgMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            got: arg_types.to_vec(),
        })
    }
}

pub fn arg_mismatch(name: &str, expected: &str, arg_types: &[DataType]) -> CompileError {
    CompileError::FunctionArgMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got: arg_types.to_vec(),
    }
}

/// Borrow the single argument column of a unary function.
pub fn unary_arg<'a>(name: &str, args: &'a [Column]) -> Result<&'a Column, RuntimeError> {
    match args {
        [a] => Ok(a),
        _ => RuntimeError::new(format!("{} expects 1 argument, got {}", name, args.len())).err(),
    }
}

/// Borrow both argument columns of a binary function.
pub fn binary_args<'a>(name: &str, args: &'a [Column]) -> Result<(&'a Column, &'a Column), RuntimeError> {
    match args {
        [a, b] => Ok((a, b)),
        _ => RuntimeError::new(format!("{} expects 2 arguments, got {}", name, args.len())).err(),
    }
}
