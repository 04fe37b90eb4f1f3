use std::cmp::Ordering;

use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::analyzer::CompileError,
    runtime::{Accumulator, Function, RuntimeError, accumulate, coerce, compare_values, expect_arity},
};

pub struct MinImpl;
pub struct MaxImpl;

struct MinMaxAcc {
    best: Option<Value>,
    want: Ordering,
}

impl Accumulator for MinMaxAcc {
    fn update(&mut self, args: &[Value]) -> Result<(), RuntimeError> {
        let Some(v) = args.first() else {
            return RuntimeError::new("min/max expects 1 argument").err();
        };
        if v.is_null() {
            return Ok(());
        }
        let replace = match &self.best {
            None => true,
            Some(best) => compare_values(v, best) == Some(self.want),
        };
        if replace {
            self.best = Some(v.clone());
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        self.best.clone().unwrap_or(Value::Null)
    }
}

fn evaluate_extreme(want: Ordering, num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
    let ty = args.first().map(|c| c.ty).unwrap_or(DataType::Null);
    let out = accumulate(Box::new(MinMaxAcc { best: None, want }), num_rows, args)?;
    Ok(out.into_iter().map(|v| coerce(v, ty)).collect())
}

impl Function for MinImpl {
    fn name(&self) -> &'static str { "min" }

    fn is_aggregate(&self) -> bool { true }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "MIN(expr)", arg_types, 1)?;
        Ok(arg_types[0])
    }

    fn evaluate(&self, num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        evaluate_extreme(Ordering::Less, num_rows, args)
    }
}

impl Function for MaxImpl {
    fn name(&self) -> &'static str { "max" }

    fn is_aggregate(&self) -> bool { true }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "MAX(expr)", arg_types, 1)?;
        Ok(arg_types[0])
    }

    fn evaluate(&self, num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        evaluate_extreme(Ordering::Greater, num_rows, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn min_max_numeric_and_string() {
        let ints = Column::new(DataType::Int, vec![json!(5), Value::Null, json!(2), json!(9)]);
        assert_eq!(MinImpl.evaluate(1, &[ints.clone()]).unwrap(), vec![json!(2)]);
        assert_eq!(MaxImpl.evaluate(1, &[ints]).unwrap(), vec![json!(9)]);

        let strings = Column::new(DataType::String, ["pear", "apple", "plum"].map(|s| json!(s)).to_vec());
        assert_eq!(MinImpl.evaluate(1, &[strings.clone()]).unwrap(), vec![json!("apple")]);
        assert_eq!(MaxImpl.evaluate(1, &[strings]).unwrap(), vec![json!("plum")]);
    }

    #[test]
    fn all_null_group_is_null() {
        let nulls = Column::new(DataType::Int, vec![Value::Null, Value::Null]);
        assert_eq!(MaxImpl.evaluate(1, &[nulls]).unwrap(), vec![Value::Null]);
    }
}
