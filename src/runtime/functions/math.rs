use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::analyzer::CompileError,
    runtime::{Function, RuntimeError, arg_mismatch, binary_args, expect_arity, float_value, int_value, unary_arg},
};

pub struct AbsImpl;

impl Function for AbsImpl {
    fn name(&self) -> &'static str { "abs" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "ABS(number)", arg_types, 1)?;
        match arg_types[0] {
            DataType::Null => Ok(DataType::Int),
            ty if ty.is_numeric() => Ok(ty),
            _ => Err(arg_mismatch(self.name(), "ABS(number)", arg_types)),
        }
    }

    fn evaluate(&self, _num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let arg = unary_arg(self.name(), args)?;
        Ok(arg
            .values
            .iter()
            .map(|v| match (v.as_i64(), v.as_f64()) {
                (Some(i), _) => i.checked_abs().map(int_value).unwrap_or(Value::Null),
                (None, Some(f)) => float_value(f.abs()),
                _ => Value::Null,
            })
            .collect())
    }
}

/// `POW(base, exponent)`: INT when both are INT, FLOAT otherwise. A negative
/// integer exponent or an overflow yields null.
pub struct PowImpl;

impl PowImpl {
    fn result_type(base: DataType, exp: DataType) -> DataType {
        if base == DataType::Float || exp == DataType::Float { DataType::Float } else { DataType::Int }
    }
}

impl Function for PowImpl {
    fn name(&self) -> &'static str { "pow" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "POW(number, number)", arg_types, 2)?;
        if arg_types.iter().all(|t| t.is_numeric_or_null()) {
            Ok(Self::result_type(arg_types[0], arg_types[1]))
        } else {
            Err(arg_mismatch(self.name(), "POW(number, number)", arg_types))
        }
    }

    fn evaluate(&self, _num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let (base, exp) = binary_args(self.name(), args)?;
        let ty = Self::result_type(base.ty, exp.ty);

        Ok(base
            .values
            .iter()
            .zip(&exp.values)
            .map(|(b, e)| {
                if ty == DataType::Int {
                    match (b.as_i64(), e.as_i64().and_then(|e| u32::try_from(e).ok())) {
                        (Some(b), Some(e)) => b.checked_pow(e).map(int_value).unwrap_or(Value::Null),
                        _ => Value::Null,
                    }
                } else {
                    match (b.as_f64(), e.as_f64()) {
                        (Some(b), Some(e)) => float_value(b.powf(e)),
                        _ => Value::Null,
                    }
                }
            })
            .collect())
    }
}
