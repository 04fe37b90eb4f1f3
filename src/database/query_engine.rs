use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use tracing::debug;

use crate::{
    QueryError,
    database::{Config, Schema, Table, TableError},
    executor::{Context, Evaluator},
    parser::analyzer::{Compiler, TypedSelect},
    runtime::{Clock, FunctionRegistry},
};

/// Table store plus the query entry point.
///
/// Tables are immutable once loaded; loading a table under an existing name
/// replaces it. The engine holds no lock: callers that share it between
/// threads must serialize `load_table` against running queries themselves.
pub struct QueryEngine {
    config: Config,
    tables: HashMap<String, Table>,
    registry: FunctionRegistry,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::with_config(Config::new())
    }
}

impl QueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self { config, tables: HashMap::new(), registry: FunctionRegistry::default_registry() }
    }

    /// Replace the clock read by `NOW()`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.registry = FunctionRegistry::with_clock(clock);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn load_table(&mut self, table: Table) {
        let replaced = self.tables.insert(table.name().to_string(), table);
        debug!(replaced = replaced.is_some(), tables = self.tables.len(), "loaded table");
    }

    /// Build a table from a JSON array of row objects and load it.
    pub fn load_json(&mut self, name: &str, rows: Value) -> Result<(), TableError> {
        let table = Table::from_json_rows(name, rows)?;
        self.load_table(table);
        Ok(())
    }

    pub fn delete_table(&mut self, name: &str) -> Option<Table> {
        let removed = self.tables.remove(name);
        debug!(table = name, removed = removed.is_some(), "deleted table");
        removed
    }

    pub fn get_all_tables(&self) -> &HashMap<String, Table> {
        &self.tables
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_schema(&self, name: &str) -> Option<Schema> {
        self.tables.get(name).map(Table::schema)
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Lex, parse and bind a query against the loaded tables.
    pub fn compile_query(&self, text: &str) -> Result<TypedSelect, QueryError> {
        Compiler::new(&self.tables, &self.registry).compile_text(text)
    }

    pub fn evaluate_query(&self, text: &str) -> Result<Context, QueryError> {
        let select = self.compile_query(text)?;
        let result = Evaluator::new(&self.tables, &self.config).evaluate_select(&select)?;
        debug!(rows = result.num_rows, "query finished");
        Ok(result)
    }

    /// Evaluate and wrap the result as a table named by
    /// `Config::result_table_name`.
    pub fn evaluate_query_as_table(&self, text: &str) -> Result<Table, QueryError> {
        let result = self.evaluate_query(text)?;
        Ok(result.into_table(&self.config.result_table_name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{database::DataType, runtime::FixedClock};
    use serde_json::json;

    fn engine() -> QueryEngine {
        let mut engine = QueryEngine::new();
        engine
            .load_json("people", json!([
                { "id": 1, "name": "Ana", "age": 29 },
                { "id": 2, "name": "Rui", "age": 34 },
                { "id": 3, "name": "Eva", "age": null }
            ]))
            .unwrap();
        engine
    }

    #[test]
    fn load_replaces_tables_by_name() {
        let mut engine = engine();
        assert_eq!(engine.table_names(), vec!["people"]);

        engine.load_table(Table::from_columns("people", vec![("id", DataType::Int, vec![json!(9)])]).unwrap());
        assert_eq!(engine.get_all_tables().len(), 1);
        assert_eq!(engine.get_table("people").unwrap().num_rows(), 1);
    }

    #[test]
    fn schema_and_delete() {
        let mut engine = engine();
        let schema = engine.table_schema("people").unwrap();
        assert_eq!(schema.keys().cloned().collect::<Vec<_>>(), vec!["id", "name", "age"]);
        assert_eq!(schema["age"], DataType::Int);

        assert!(engine.delete_table("people").is_some());
        assert!(engine.delete_table("people").is_none());
        let err = engine.evaluate_query("SELECT id FROM people").unwrap_err();
        assert_eq!(err.kind(), "CompileError");
    }

    #[test]
    fn evaluate_query_runs_the_whole_pipeline() {
        let engine = engine();
        let result = engine.evaluate_query("SELECT name FROM people WHERE age > 30").unwrap();
        assert_eq!(result.to_json_rows(), vec![json!({ "name": "Rui" })]);
    }

    #[test]
    fn result_as_table_uses_configured_name() {
        let mut engine = QueryEngine::with_config(Config::named("answer"));
        engine.load_json("t", json!([{ "a": 1 }, { "a": 2 }])).unwrap();
        let table = engine.evaluate_query_as_table("SELECT a * 2 AS b FROM t").unwrap();
        assert_eq!(table.name(), "answer");
        assert_eq!(table.column("b").unwrap().values, vec![json!(2), json!(4)]);
    }

    #[test]
    fn default_config_names_results_query_result() {
        let engine = engine();
        assert_eq!(engine.config(), &Config::new());
        assert!(engine.config().implicit_group_on_empty);
        let table = engine.evaluate_query_as_table("SELECT COUNT(*) AS n FROM people").unwrap();
        assert_eq!(table.name(), "query_result");
        assert_eq!(table.to_json_rows(), vec![json!({ "n": 3 })]);
    }

    #[test]
    fn now_reads_the_injected_clock() {
        let engine = QueryEngine::new().with_clock(Arc::new(FixedClock::from_secs(1_000)));
        let result = engine.evaluate_query("SELECT NOW()").unwrap();
        assert_eq!(result.column("f0_").unwrap().values, vec![json!(1_000_000_000)]);
    }

    #[test]
    fn errors_carry_their_stage() {
        let engine = engine();
        assert_eq!(engine.evaluate_query("SELECT #").unwrap_err().kind(), "LexError");
        assert_eq!(engine.evaluate_query("SELECT FROM people").unwrap_err().kind(), "ParseError");
        assert_eq!(engine.evaluate_query("SELECT nope FROM people").unwrap_err().kind(), "CompileError");
    }
}
