use std::cmp::Ordering;

use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::{analyzer::CompileError, ast::BinaryOp},
    runtime::{Function, RuntimeError, arg_mismatch, binary_args, compare_values, expect_arity},
};

/// `= != > < >= <=`, three-valued: a null operand yields null.
pub struct ComparisonImpl(pub BinaryOp);

impl ComparisonImpl {
    fn holds(&self, ord: Ordering) -> bool {
        match self.0 {
            BinaryOp::Eq => ord == Ordering::Equal,
            BinaryOp::NotEq => ord != Ordering::Equal,
            BinaryOp::Gt => ord == Ordering::Greater,
            BinaryOp::Lt => ord == Ordering::Less,
            BinaryOp::GtEq => ord != Ordering::Less,
            BinaryOp::LtEq => ord != Ordering::Greater,
            _ => false,
        }
    }
}

impl Function for ComparisonImpl {
    fn name(&self) -> &'static str {
        match self.0 {
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
            BinaryOp::GtEq => ">=",
            BinaryOp::LtEq => "<=",
            _ => "comparison",
        }
    }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "two comparable operands", arg_types, 2)?;
        if DataType::comparable(arg_types[0], arg_types[1]) {
            Ok(DataType::Bool)
        } else {
            Err(arg_mismatch(self.name(), "two comparable operands", arg_types))
        }
    }

    fn evaluate(&self, _num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let (left, right) = binary_args(self.name(), args)?;
        Ok(left
            .values
            .iter()
            .zip(&right.values)
            .map(|(a, b)| match compare_values(a, b) {
                Some(ord) => Value::Bool(self.holds(ord)),
                None => Value::Null,
            })
            .collect())
    }
}
