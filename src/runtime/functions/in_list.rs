use serde_json::Value;

use crate::{
    database::{Column, DataType},
    parser::analyzer::CompileError,
    runtime::{Function, RuntimeError, Truth, arg_mismatch, values_equal},
};

/// `expr IN (v1, v2, ...)`. The first argument is the probe, the rest the
/// list. True on any match; otherwise null if some comparison was null, else
/// false.
pub struct InImpl;

impl Function for InImpl {
    fn name(&self) -> &'static str { "in" }

    fn check_types(&self, arg_types: &[DataType]) -> Result<DataType, CompileError> {
        let Some((probe, list)) = arg_types.split_first() else {
            return Err(arg_mismatch(self.name(), "expr IN (value, ...)", arg_types));
        };
        if list.is_empty() || !list.iter().all(|t| DataType::comparable(*probe, *t)) {
            return Err(arg_mismatch(self.name(), "expr IN (value, ...)", arg_types));
        }
        Ok(DataType::Bool)
    }

    fn evaluate(&self, num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
        let Some((probe, list)) = args.split_first() else {
            return RuntimeError::new("in expects a probe and a list").err();
        };

        Ok((0..num_rows)
            .map(|i| {
                let v = &probe.values[i];
                list.iter()
                    .map(|c| match values_equal(v, &c.values[i]) {
                        Some(b) => Truth::from(b),
                        None => Truth::Unknown,
                    })
                    .fold(Truth::False, |acc, t| acc.or(t))
                    .into_value()
            })
            .collect())
    }
}
