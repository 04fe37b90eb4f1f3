use std::collections::HashMap;

use indexmap::IndexMap;

use crate::database::{DataType, Table};

/// Ordered column name -> declared type.
pub type Schema = IndexMap<String, DataType>;

/// Read access to table schemas, consumed by the binder.
pub trait SchemaProvider {
    /// Given a table name, return its schema if the table is loaded.
    fn schema_of(&self, table_name: &str) -> Option<Schema>;
}

/// Read access to table data, consumed by the evaluator.
pub trait TableProvider: SchemaProvider {
    fn table(&self, table_name: &str) -> Option<&Table>;
}

impl SchemaProvider for HashMap<String, Table> {
    fn schema_of(&self, table_name: &str) -> Option<Schema> {
        self.get(table_name).map(Table::schema)
    }
}

impl TableProvider for HashMap<String, Table> {
    fn table(&self, table_name: &str) -> Option<&Table> {
        self.get(table_name)
    }
}
