/// Engine configuration.
///
/// - `result_table_name` is the name given to a query result converted into a
///   [`Table`](crate::database::Table).
/// - `implicit_group_on_empty` controls whether an aggregate select without
///   GROUP BY yields one row (`COUNT(*) = 0`, `SUM(x) = NULL`) when no input
///   rows survive the WHERE filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub result_table_name: String,
    pub implicit_group_on_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { result_table_name: "query_result".to_string(), implicit_group_on_empty: true }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(result_table_name: &str, implicit_group_on_empty: bool) -> Self {
        Self {
            result_table_name: result_table_name.to_string(),
            implicit_group_on_empty,
        }
    }

    pub fn named(result_table_name: &str) -> Self {
        Self {
            result_table_name: result_table_name.to_string(),
            ..Self::default()
        }
    }
}
