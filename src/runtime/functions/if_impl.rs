use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::analyzer::CompileError,
    runtime::{Function, RuntimeError, Truth, arg_mismatch, coerce, expect_arity},
};

/// `IF(cond, a, b)`. A null condition yields null.
pub struct IfImpl;

impl Function for IfImpl {
    fn name(&self) -> &'static str { "if" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "IF(condition, then, else)", arg_types, 3)?;
        if !arg_types[0].is_bool_or_null() {
            return Err(arg_mismatch(self.name(), "a boolean condition", arg_types));
        }
        DataType::promote(arg_types[1], arg_types[2])
            .ok_or_else(|| arg_mismatch(self.name(), "branches of a common type", arg_types))
    }

    fn evaluate(&self, num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let [cond, then, other] = args else {
            return RuntimeError::new("if expects 3 arguments").err();
        };
        let ty = DataType::promote(then.ty, other.ty).unwrap_or(then.ty);

        Ok((0..num_rows)
            .map(|i| match Truth::from_value(&cond.values[i]) {
                Truth::True => coerce(then.values[i].clone(), ty),
                Truth::False => coerce(other.values[i].clone(), ty),
                Truth::Unknown => Value::Null,
            })
            .collect())
    }
}
