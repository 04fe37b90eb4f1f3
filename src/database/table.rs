use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::database::{DataType, Schema, TableError};

/// A single column of data: a declared type plus raw values, any of which may
/// be `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub ty: DataType,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(ty: DataType, values: Vec<Value>) -> Self {
        Self { ty, values }
    }

    pub fn empty(ty: DataType) -> Self {
        Self { ty, values: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Named, immutable, column-oriented table held by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    num_rows: usize,
    columns: IndexMap<String, Column>,
}

impl Table {
    /// Build a table, checking that every column holds `num_rows` values and
    /// that every non-null value conforms to the column type.
    pub fn new(name: impl Into<String>, num_rows: usize, columns: IndexMap<String, Column>) -> Result<Self, TableError> {
        for (column_name, column) in &columns {
            if column.len() != num_rows {
                return Err(TableError::LengthMismatch {
                    column: column_name.clone(),
                    expected: num_rows,
                    got: column.len(),
                });
            }
            if let Some(row) = column.values.iter().position(|v| !column.ty.conforms(v)) {
                return Err(TableError::TypeMismatch { column: column_name.clone(), ty: column.ty, row });
            }
        }

        Ok(Self { name: name.into(), num_rows, columns })
    }

    /// Convenience constructor from `(name, type, values)` triples. The row
    /// count is taken from the first column.
    pub fn from_columns(name: impl Into<String>, columns: Vec<(&str, DataType, Vec<Value>)>) -> Result<Self, TableError> {
        let num_rows = columns.first().map(|(_, _, values)| values.len()).unwrap_or(0);
        let columns = columns
            .into_iter()
            .map(|(column_name, ty, values)| (column_name.to_string(), Column::new(ty, values)))
            .collect();
        Self::new(name, num_rows, columns)
    }

    /// Build a table from a JSON array of row objects.
    ///
    /// Columns appear in first-seen key order; a key missing from a row is
    /// null for that row. Column types are inferred from the non-null values,
    /// promoting `Int` + `Float` to `Float`.
    pub fn from_json_rows(name: impl Into<String>, rows: Value) -> Result<Self, TableError> {
        let Value::Array(items) = rows else {
            return Err(TableError::NotAnArray);
        };

        let mut schema: Schema = IndexMap::new();
        for (row, item) in items.iter().enumerate() {
            let obj = item.as_object().ok_or(TableError::NotAnObject { row })?;
            for (key, value) in obj {
                let ty = DataType::of_value(value)
                    .ok_or_else(|| TableError::UnsupportedValue { column: key.clone(), row })?;
                match schema.get_mut(key) {
                    Some(existing) => {
                        *existing = DataType::promote(*existing, ty)
                            .ok_or_else(|| TableError::TypeMismatch { column: key.clone(), ty: *existing, row })?;
                    }
                    None => {
                        schema.insert(key.clone(), ty);
                    }
                }
            }
        }

        let mut columns = IndexMap::new();
        for (key, ty) in &schema {
            let values = items
                .iter()
                .map(|item| {
                    let value = item.get(key).cloned().unwrap_or(Value::Null);
                    if *ty == DataType::Float { widen_to_float(value) } else { value }
                })
                .collect();
            columns.insert(key.clone(), Column::new(*ty, values));
        }

        Self::new(name, items.len(), columns)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn columns(&self) -> &IndexMap<String, Column> {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Ordered column name -> declared type.
    pub fn schema(&self) -> Schema {
        self.columns.iter().map(|(name, column)| (name.clone(), column.ty)).collect()
    }

    /// Render the rows as JSON objects keyed by column name.
    pub fn to_json_rows(&self) -> Vec<Value> {
        rows_as_json(self.num_rows, &self.columns)
    }
}

pub(crate) fn rows_as_json(num_rows: usize, columns: &IndexMap<String, Column>) -> Vec<Value> {
    (0..num_rows)
        .map(|i| {
            let mut row = Map::new();
            for (name, column) in columns {
                row.insert(name.clone(), column.values[i].clone());
            }
            Value::Object(row)
        })
        .collect()
}

fn widen_to_float(value: Value) -> Value {
    match &value {
        Value::Number(n) if n.is_i64() => n
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(value),
        _ => value,
    }
}
