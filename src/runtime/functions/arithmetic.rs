use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::{analyzer::CompileError, ast::BinaryOp},
    runtime::{Function, RuntimeError, arg_mismatch, binary_args, expect_arity, float_value, int_value, unary_arg},
};

/// `+ - * / %` over numbers. Null operands, division by zero and integer
/// overflow all produce null for that row.
pub struct ArithmeticImpl(pub BinaryOp);

impl ArithmeticImpl {
    fn result_type(&self, left: DataType, right: DataType) -> DataType {
        match (self.0, left, right) {
            (BinaryOp::Div, _, _) => DataType::Float,
            (_, DataType::Float, _) | (_, _, DataType::Float) => DataType::Float,
            (_, DataType::Null, DataType::Null) => DataType::Null,
            _ => DataType::Int,
        }
    }

    fn apply_int(&self, a: i64, b: i64) -> Option<i64> {
        match self.0 {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Sub => a.checked_sub(b),
            BinaryOp::Mul => a.checked_mul(b),
            BinaryOp::Mod => a.checked_rem(b),
            _ => None,
        }
    }

    fn apply_float(&self, a: f64, b: f64) -> Option<f64> {
        match self.0 {
            BinaryOp::Add => Some(a + b),
            BinaryOp::Sub => Some(a - b),
            BinaryOp::Mul => Some(a * b),
            BinaryOp::Div if b != 0.0 => Some(a / b),
            BinaryOp::Mod if b != 0.0 => Some(a % b),
            _ => None,
        }
    }
}

impl Function for ArithmeticImpl {
    fn name(&self) -> &'static str {
        match self.0 {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            _ => "arithmetic",
        }
    }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "two numeric operands", arg_types, 2)?;
        let (left, right) = (arg_types[0], arg_types[1]);
        if !left.is_numeric_or_null() || !right.is_numeric_or_null() {
            return Err(arg_mismatch(self.name(), "two numeric operands", arg_types));
        }
        Ok(self.result_type(left, right))
    }

    fn evaluate(&self, _num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let (left, right) = binary_args(self.name(), args)?;
        let ty = self.result_type(left.ty, right.ty);

        Ok(left
            .values
            .iter()
            .zip(&right.values)
            .map(|(a, b)| {
                if a.is_null() || b.is_null() {
                    return Value::Null;
                }
                if ty == DataType::Int {
                    match (a.as_i64(), b.as_i64()) {
                        (Some(a), Some(b)) => self.apply_int(a, b).map(int_value).unwrap_or(Value::Null),
                        _ => Value::Null,
                    }
                } else {
                    match (a.as_f64(), b.as_f64()) {
                        (Some(a), Some(b)) => self.apply_float(a, b).map(float_value).unwrap_or(Value::Null),
                        _ => Value::Null,
                    }
                }
            })
            .collect())
    }
}

/// Unary minus.
pub struct NegateImpl;

impl Function for NegateImpl {
    fn name(&self) -> &'static str { "negate" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "a numeric operand", arg_types, 1)?;
        match arg_types[0] {
            DataType::Null => Ok(DataType::Int),
            ty if ty.is_numeric() => Ok(ty),
            _ => Err(arg_mismatch(self.name(), "a numeric operand", arg_types)),
        }
    }

    fn evaluate(&self, _num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let arg = unary_arg(self.name(), args)?;
        Ok(arg
            .values
            .iter()
            .map(|v| match (v.as_i64(), v.as_f64()) {
                (Some(i), _) => i.checked_neg().map(int_value).unwrap_or(Value::Null),
                (None, Some(f)) => float_value(-f),
                _ => Value::Null,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ints(values: Vec<Value>) -> Column { Column::new(DataType::Int, values) }

    #[test]
    fn result_types() {
        let add = ArithmeticImpl(BinaryOp::Add);
        assert_eq!(add.check_types(&[DataType::Int, DataType::Int]).unwrap(), DataType::Int);
        assert_eq!(add.check_types(&[DataType::Int, DataType::Float]).unwrap(), DataType::Float);
        assert_eq!(ArithmeticImpl(BinaryOp::Div).check_types(&[DataType::Int, DataType::Int]).unwrap(), DataType::Float);
        assert!(matches!(
            add.check_types(&[DataType::Int, DataType::String]),
            Err(CompileError::FunctionArgMismatch { .. })
        ));
    }

    #[test]
    fn nulls_propagate_per_row() {
        let mul = ArithmeticImpl(BinaryOp::Mul);
        let out = mul
            .evaluate(3, &[ints(vec![json!(2), Value::Null, json!(4)]), ints(vec![json!(3), json!(5), Value::Null])])
            .unwrap();
        assert_eq!(out, vec![json!(6), Value::Null, Value::Null]);
    }

    #[test]
    fn division_is_real_and_zero_divisor_is_null() {
        let div = ArithmeticImpl(BinaryOp::Div);
        let out = div.evaluate(2, &[ints(vec![json!(7), json!(1)]), ints(vec![json!(2), json!(0)])]).unwrap();
        assert_eq!(out, vec![json!(3.5), Value::Null]);

        let rem = ArithmeticImpl(BinaryOp::Mod);
        let out = rem.evaluate(2, &[ints(vec![json!(-7), json!(1)]), ints(vec![json!(3), json!(0)])]).unwrap();
        assert_eq!(out, vec![json!(-1), Value::Null]);
    }

    #[test]
    fn int_overflow_is_null() {
        let add = ArithmeticImpl(BinaryOp::Add);
        let out = add.evaluate(1, &[ints(vec![json!(i64::MAX)]), ints(vec![json!(1)])]).unwrap();
        assert_eq!(out, vec![Value::Null]);
    }

    #[test]
    fn negate_keeps_type() {
        let out = NegateImpl
            .evaluate(3, &[Column::new(DataType::Float, vec![json!(1.5), json!(2), Value::Null])])
            .unwrap();
        assert_eq!(out, vec![json!(-1.5), json!(-2), Value::Null]);
    }
}
