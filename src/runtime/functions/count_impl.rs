use std::collections::HashSet;

use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::analyzer::CompileError,
    runtime::{Accumulator, Function, KeyValue, RuntimeError, accumulate, expect_arity, int_value},
};

/// `COUNT(expr)`; `COUNT(*)` is bound as `COUNT(1)`.
pub struct CountImpl;

impl Function for CountImpl {
    fn name(&self) -> &'static str { "count" }

    fn is_aggregate(&self) -> bool { true }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "COUNT(*|expr)", arg_types, 1)?;
        Ok(DataType::Int)
    }

    fn evaluate(&self, num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        accumulate(Box::new(CountAcc { cnt: 0, distinct: None }), num_rows, args)
    }
}

/// `COUNT(DISTINCT expr)`.
pub struct CountDistinctImpl;

impl Function for CountDistinctImpl {
    fn name(&self) -> &'static str { "count_distinct" }

    fn is_aggregate(&self) -> bool { true }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "COUNT(DISTINCT expr)", arg_types, 1)?;
        Ok(DataType::Int)
    }

    fn evaluate(&self, num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        accumulate(Box::new(CountAcc { cnt: 0, distinct: Some(HashSet::new()) }), num_rows, args)
    }
}

struct CountAcc {
    cnt: i64,
    distinct: Option<HashSet<KeyValue>>,
}

impl Accumulator for CountAcc {
    fn update(&mut self, args: &[Value]) -> Result<(), RuntimeError> {
        let [v] = args else {
            return RuntimeError::new("count expects 1 argument").err();
        };
        if v.is_null() {
            return Ok(());
        }
        match &mut self.distinct {
            Some(seen) => {
                if seen.insert(KeyValue::from_value(v)) {
                    self.cnt += 1;
                }
            }
            None => self.cnt += 1,
        }
        Ok(())
    }

    fn finalize(&self) -> Value {
        int_value(self.cnt)
    }
}
