use std::sync::Arc;

use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::analyzer::CompileError,
    runtime::{Clock, Function, RuntimeError, expect_arity, int_value},
};

/// `NOW()`: current clock reading in microseconds.
pub struct NowImpl {
    clock: Arc<dyn Clock>,
}

impl NowImpl {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Function for NowImpl {
    fn name(&self) -> &'static str { "now" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        expect_arity(self.name(), "NOW()", arg_types, 0)?;
        Ok(DataType::Int)
    }

    fn evaluate(&self, num_rows: usize, _args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        Ok(vec![int_value(self.clock.now_micros()); num_rows])
    }
}
