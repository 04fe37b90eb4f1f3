use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::analyzer::CompileError,
    runtime::{Accumulator, Function, RuntimeError, accumulate, arg_mismatch, expect_arity, float_value, int_value},
};

pub struct SumImpl;

impl Function for SumImpl {
    fn name(&self) -> &'static str { "sum" }

    fn is_aggregate(&self) -> bool { true }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "SUM(number)", arg_types, 1)?;
        match arg_types[0] {
            DataType::Null => Ok(DataType::Int),
            ty if ty.is_numeric() => Ok(ty),
            _ => Err(arg_mismatch(self.name(), "SUM(number)", arg_types)),
        }
    }

    fn evaluate(&self, num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let is_float = args.first().is_some_and(|c| c.ty == DataType::Float);
        accumulate(Box::new(SumAcc { is_float, int: 0, float: 0.0, seen: false, overflow: false }), num_rows, args)
    }
}

struct SumAcc {
    is_float: bool,
    int: i64,
    float: f64,
    seen: bool,
    overflow: bool,
}

impl Accumulator for SumAcc {
    fn update(&mut self, args: &[Value]) -> Result<(), RuntimeError> {
        let Some(v) = args.first() else {
            return RuntimeError::new("sum expects 1 argument").err();
        };
        if v.is_null() {
            return Ok(());
        }
        self.seen = true;
        if self.is_float {
            self.float += v.as_f64().unwrap_or(0.0);
        } else {
            match v.as_i64().and_then(|i| self.int.checked_add(i)) {
                Some(total) => self.int = total,
                None => self.overflow = true,
            }
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        match (self.seen, self.is_float) {
            (false, _) => Value::Null,
            (true, true) => float_value(self.float),
            (true, false) if self.overflow => Value::Null,
            (true, false) => int_value(self.int),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sum_ignores_nulls_and_broadcasts() {
        let out = SumImpl
            .evaluate(2, &[Column::new(DataType::Int, vec![Value::Null, json!(2), json!(3)])])
            .unwrap();
        assert_eq!(out, vec![json!(5), json!(5)]);
    }

    #[test]
    fn sum_of_nothing_is_null() {
        assert_eq!(SumImpl.evaluate(1, &[Column::new(DataType::Int, vec![])]).unwrap(), vec![Value::Null]);
        assert_eq!(
            SumImpl.evaluate(1, &[Column::new(DataType::Int, vec![Value::Null])]).unwrap(),
            vec![Value::Null]
        );
    }

    #[test]
    fn sum_float() {
        let out = SumImpl
            .evaluate(1, &[Column::new(DataType::Float, vec![json!(1.5), json!(2.25), json!(1)])])
            .unwrap();
        assert_eq!(out, vec![json!(4.75)]);
        assert!(SumImpl.check_types(&[DataType::String]).is_err());
    }
}
