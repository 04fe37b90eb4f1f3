use serde_json::Value;

use crate::{database::Column, runtime::RuntimeError};

/// The per-group state of an aggregate.
/// The evaluator:
///   1) evaluates the aggregate's arguments over the group's member rows
///   2) calls `update(&mut self, &args)` once per member row
///   3) after all rows, calls `finalize()`
pub trait Accumulator: Send {
    /// Update the running state with the evaluated arguments of this row.
    fn update(&mut self, args: &[Value]) -> Result<(), RuntimeError>;

    /// Produce the final result as a JSON value.
    fn finalize(&self) -> Value;
}

/// Feed every row of `args` into `acc` and broadcast the result to
/// `num_rows` output rows.
pub fn accumulate(mut acc: Box<dyn Accumulator>, num_rows: usize, args: &[Column]) -> Result<Vec<Value>, RuntimeError> {
    let member_rows = args.first().map(Column::len).unwrap_or(0);
    let mut row = Vec::with_capacity(args.len());
    for i in 0..member_rows {
        row.clear();
        row.extend(args.iter().map(|c| c.values[i].clone()));
        acc.update(&row)?;
    }
    Ok(vec![acc.finalize(); num_rows])
}
