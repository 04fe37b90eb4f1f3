use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::analyzer::CompileError,
    runtime::{Function, RuntimeError, Truth, arg_mismatch, binary_args, expect_arity, unary_arg},
};

fn check_bool_args(name: &str, arg_types: &[DataType], count: usize) -> Result<DataType, CompileError> {
    expect_arity(name, "boolean operands", arg_types, count)?;
    if arg_types.iter().all(|t| t.is_bool_or_null()) {
        Ok(DataType::Bool)
    } else {
        Err(arg_mismatch(name, "boolean operands", arg_types))
    }
}

fn combine(args: &[Column], name: &str, op: impl Fn(Truth, Truth) -> Truth) -> Result<Vec<Value>, RuntimeError> {
    let (left, right) = binary_args(name, args)?;
    Ok(left
        .values
        .iter()
        .zip(&right.values)
        .map(|(a, b)| op(Truth::from_value(a), Truth::from_value(b)).into_value())
        .collect())
}

pub struct AndImpl;

impl Function for AndImpl {
    fn name(&self) -> &'static str { "and" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        check_bool_args(self.name(), arg_types, 2)
    }

    fn evaluate(&self, _num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        combine(args, self.name(), |a, b| a.and(b))
    }
}

pub struct OrImpl;

impl Function for OrImpl {
    fn name(&self) -> &'static str { "or" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        check_bool_args(self.name(), arg_types, 2)
    }

    fn evaluate(&self, _num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        combine(args, self.name(), |a, b| a.or(b))
    }
}

pub struct NotImpl;

impl Function for NotImpl {
    fn name(&self) -> &'static str { "not" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        check_bool_args(self.name(), arg_types, 1)
    }

    fn evaluate(&self, _num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let arg = unary_arg(self.name(), args)?;
        Ok(arg.values.iter().map(|v| Truth::from_value(v).not().into_value()).collect())
    }
}
