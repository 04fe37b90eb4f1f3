use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::analyzer::CompileError,
    runtime::{Function, RuntimeError, expect_arity, unary_arg},
};

pub struct IsNullImpl;

impl Function for IsNullImpl {
    fn name(&self) -> &'static str { "is null" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "one operand", arg_types, 1)?;
        Ok(DataType::Bool)
    }

    fn evaluate(&self, _num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let arg = unary_arg(self.name(), args)?;
        Ok(arg.values.iter().map(|v| Value::Bool(v.is_null())).collect())
    }
}

pub struct IsNotNullImpl;

impl Function for IsNotNullImpl {
    fn name(&self) -> &'static str { "is not null" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "one operand", arg_types, 1)?;
        Ok(DataType::Bool)
    }

    fn evaluate(&self, _num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let arg = unary_arg(self.name(), args)?;
        Ok(arg.values.iter().map(|v| Value::Bool(!v.is_null())).collect())
    }
}
