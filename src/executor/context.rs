use indexmap::IndexMap;
use serde_json::Value;

use crate::{
    database::{Column, DataType, Table, table::rows_as_json},
    parser::analyzer::TypeContext,
    runtime::{RuntimeError, coerce},
};

/// Execution-time analog of [`TypeContext`]: named columns sharing one row
/// count, plus the optional aggregate scope seen by aggregate arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub num_rows: usize,
    pub columns: IndexMap<String, Column>,
    pub aggregate_context: Option<Box<Context>>,
}

impl Context {
    pub fn new(
        num_rows: usize,
        columns: IndexMap<String, Column>,
        aggregate_context: Option<Context>,
    ) -> Result<Self, RuntimeError> {
        for (name, column) in &columns {
            if column.len() != num_rows {
                return RuntimeError::new(format!(
                    "column {} had {} rows, expected {}",
                    name,
                    column.len(),
                    num_rows
                ))
                .err();
            }
        }
        if aggregate_context.as_ref().is_some_and(|agg| agg.aggregate_context.is_some()) {
            return RuntimeError::new("aggregate context cannot be nested").err();
        }
        Ok(Self { num_rows, columns, aggregate_context: aggregate_context.map(Box::new) })
    }

    /// One row, no columns: the source of a SELECT without FROM.
    pub fn empty_row() -> Self {
        Self { num_rows: 1, columns: IndexMap::new(), aggregate_context: None }
    }

    /// Table columns renamed, in order, to the names of `type_ctx`.
    pub fn from_table(table: &Table, type_ctx: &TypeContext) -> Result<Self, RuntimeError> {
        if table.columns().len() != type_ctx.columns.len() {
            return RuntimeError::new(format!("table {} does not match its compiled schema", table.name())).err();
        }
        let columns = type_ctx.columns.keys().cloned().zip(table.columns().values().cloned()).collect();
        Self::new(table.num_rows(), columns, None)
    }

    /// Same columns in the same order under the names of `type_ctx`.
    pub fn renamed(self, type_ctx: &TypeContext) -> Result<Self, RuntimeError> {
        if self.columns.len() != type_ctx.columns.len() {
            return RuntimeError::new("context does not match its compiled schema").err();
        }
        let columns = type_ctx.columns.keys().cloned().zip(self.columns.into_values()).collect();
        Self::new(self.num_rows, columns, None)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Keep the rows whose mask entry is true.
    pub fn mask(&self, mask: &[bool]) -> Result<Self, RuntimeError> {
        if mask.len() != self.num_rows {
            return RuntimeError::new(format!("mask has {} rows, context has {}", mask.len(), self.num_rows)).err();
        }
        let rows: Vec<usize> = mask.iter().enumerate().filter(|(_, keep)| **keep).map(|(i, _)| i).collect();
        self.select_rows(&rows)
    }

    /// New context holding the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self, RuntimeError> {
        let mut builder = ContextBuilder::from_template(self);
        for &row in rows {
            builder.push_row(self, row)?;
        }
        Ok(builder.finish())
    }

    /// Row `index` of `self` repeated once per row of `other`, side by side
    /// with the columns of `other`. Used to probe a join condition.
    pub fn broadcast_row(&self, index: usize, other: &Context) -> Result<Self, RuntimeError> {
        let mut columns = IndexMap::with_capacity(self.columns.len() + other.columns.len());
        for (name, column) in &self.columns {
            let value = column.values.get(index).cloned().unwrap_or(Value::Null);
            columns.insert(name.clone(), Column::new(column.ty, vec![value; other.num_rows]));
        }
        for (name, column) in &other.columns {
            columns.insert(name.clone(), column.clone());
        }
        Self::new(other.num_rows, columns, None)
    }

    pub fn into_table(self, name: &str) -> Result<Table, RuntimeError> {
        Ok(Table::new(name, self.num_rows, self.columns)?)
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_json_rows(&self) -> Vec<Value> {
        rows_as_json(self.num_rows, &self.columns)
    }
}

/// Accumulates rows for a destination context and finalizes it into an
/// immutable [`Context`].
#[derive(Debug)]
pub struct ContextBuilder {
    num_rows: usize,
    columns: IndexMap<String, Column>,
}

impl ContextBuilder {
    pub fn from_columns<'a>(columns: impl IntoIterator<Item = (&'a str, DataType)>) -> Self {
        Self {
            num_rows: 0,
            columns: columns.into_iter().map(|(name, ty)| (name.to_string(), Column::empty(ty))).collect(),
        }
    }

    /// Same column names and types as `context`, no rows.
    pub fn from_template(context: &Context) -> Self {
        Self::from_columns(context.columns.iter().map(|(name, column)| (name.as_str(), column.ty)))
    }

    pub fn from_type_context(type_ctx: &TypeContext) -> Self {
        Self::from_columns(type_ctx.columns.iter().map(|(name, ty)| (name.as_str(), *ty)))
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Append row `index` of `src`, matching columns by name.
    pub fn push_row(&mut self, src: &Context, index: usize) -> Result<(), RuntimeError> {
        for (name, column) in self.columns.iter_mut() {
            let value = src
                .column(name)
                .and_then(|c| c.values.get(index))
                .ok_or_else(|| RuntimeError::new(format!("row {} of column {} not found", index, name)))?;
            column.values.push(value.clone());
        }
        self.num_rows += 1;
        Ok(())
    }

    /// Append one row given positionally.
    pub fn push_values(&mut self, values: Vec<Value>) -> Result<(), RuntimeError> {
        if values.len() != self.columns.len() {
            return RuntimeError::new(format!("row has {} values, expected {}", values.len(), self.columns.len())).err();
        }
        for (column, value) in self.columns.values_mut().zip(values) {
            let value = coerce(value, column.ty);
            column.values.push(value);
        }
        self.num_rows += 1;
        Ok(())
    }

    /// Append every row of `src`, matching columns by short name. Columns
    /// `src` lacks are filled with null.
    pub fn append_by_short_name(&mut self, src: &Context) {
        let mut by_short_name: IndexMap<&str, &Column> = IndexMap::new();
        for (name, column) in &src.columns {
            by_short_name.entry(TypeContext::short_column_name(name)).or_insert(column);
        }

        for (name, column) in self.columns.iter_mut() {
            match by_short_name.get(TypeContext::short_column_name(name)) {
                Some(src_column) => {
                    let ty = column.ty;
                    column.values.extend(src_column.values.iter().map(|v| coerce(v.clone(), ty)));
                }
                None => column.values.extend(std::iter::repeat_n(Value::Null, src.num_rows)),
            }
        }
        self.num_rows += src.num_rows;
    }

    pub fn finish(self) -> Context {
        Context { num_rows: self.num_rows, columns: self.columns, aggregate_context: None }
    }
}
