#[cfg(test)]
pub mod fixtures {
    use serde_json::json;

    use crate::database::QueryEngine;

    pub fn create_test_table(engine: &mut QueryEngine) {
        let rows = json!([
            { "val1": 4, "val2": 8 },
            { "val1": 1, "val2": 2 },
            { "val1": 8, "val2": 4 },
            { "val1": 1, "val2": 1 },
            { "val1": 2, "val2": 6 }
        ]);
        engine.load_json("test_table", rows).unwrap();
    }

    pub fn create_test_table_2(engine: &mut QueryEngine) {
        let rows = json!([
            { "val3": 3, "val2": 2 },
            { "val3": 8, "val2": 7 }
        ]);
        engine.load_json("test_table_2", rows).unwrap();
    }

    pub fn create_test_table_3(engine: &mut QueryEngine) {
        let rows = json!([
            { "foo": 1, "bar": 2 },
            { "foo": 2, "bar": 7 },
            { "foo": 4, "bar": 3 },
            { "foo": 5, "bar": 1 },
            { "foo": 1, "bar": 1 }
        ]);
        engine.load_json("test_table_3", rows).unwrap();
    }

    pub fn create_null_table(engine: &mut QueryEngine) {
        let rows = json!([
            { "foo": 1 },
            { "foo": null },
            { "foo": null },
            { "foo": 5 }
        ]);
        engine.load_json("null_table", rows).unwrap();
    }

    pub fn create_string_table(engine: &mut QueryEngine) {
        let rows = json!([
            { "str": "hello" },
            { "str": "world" }
        ]);
        engine.load_json("string_table", rows).unwrap();
    }

    pub fn create_engine() -> QueryEngine {
        let mut engine = QueryEngine::new();
        create_test_table(&mut engine);
        create_test_table_2(&mut engine);
        create_test_table_3(&mut engine);
        create_null_table(&mut engine);
        create_string_table(&mut engine);
        engine
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::fixtures::create_engine;
    use crate::{
        QueryError,
        database::{Config, DataType, QueryEngine},
        executor::Context,
        parser::analyzer::CompileError,
    };

    fn run(query: &str) -> Context {
        create_engine().evaluate_query(query).unwrap()
    }

    fn values(ctx: &Context, name: &str) -> Vec<Value> {
        ctx.column(name).unwrap_or_else(|| panic!("missing column {name}")).values.clone()
    }

    fn ints(values: Vec<Value>) -> Vec<i64> {
        values.iter().map(|v| v.as_i64().unwrap()).collect()
    }

    fn sorted_ints(values: Vec<Value>) -> Vec<i64> {
        let mut out = ints(values);
        out.sort();
        out
    }

    fn column_names(ctx: &Context) -> Vec<&str> {
        ctx.columns.keys().map(String::as_str).collect()
    }

    #[test]
    fn select_literal_arithmetic() {
        let result = run("SELECT 1 + 2");
        assert_eq!(result.num_rows, 1);
        assert_eq!(column_names(&result), vec!["f0_"]);
        assert_eq!(values(&result, "f0_"), vec![json!(3)]);
    }

    #[test]
    fn select_respects_precedence_and_parentheses() {
        assert_eq!(values(&run("SELECT 2 * (3 + 1) + 2 * 3"), "f0_"), vec![json!(14)]);
        assert_eq!(values(&run("SELECT -2 * 3 - 1"), "f0_"), vec![json!(-7)]);
    }

    #[test]
    fn select_with_where_filter() {
        let result = run("SELECT val1 + 2 FROM test_table WHERE val2 > 3");
        assert_eq!(ints(values(&result, "f0_")), vec![6, 10, 4]);
    }

    #[test]
    fn select_star_reproduces_table() {
        let engine = create_engine();
        let result = engine.evaluate_query("SELECT * FROM test_table").unwrap();
        assert_eq!(column_names(&result), vec!["val1", "val2"]);
        assert_eq!(result.to_json_rows(), engine.get_table("test_table").unwrap().to_json_rows());
    }

    #[test]
    fn bare_column_alias_keeps_name_as_written() {
        let result = run("SELECT val1, test_table.val2, val1 * 2 AS doubled, val2 - 1 FROM test_table");
        assert_eq!(column_names(&result), vec!["val1", "test_table.val2", "doubled", "f0_"]);
        assert_eq!(ints(values(&result, "doubled")), vec![8, 2, 16, 2, 4]);
    }

    #[test]
    fn table_alias_qualifies_columns() {
        let result = run("SELECT t.val1 FROM test_table t WHERE t.val2 < 3");
        assert_eq!(ints(values(&result, "t.val1")), vec![1, 1]);
    }

    #[test]
    fn group_by_column_sums() {
        let result = run("SELECT SUM(val2) FROM test_table GROUP BY val1");
        assert_eq!(result.num_rows, 4);
        assert_eq!(sorted_ints(values(&result, "f0_")), vec![3, 4, 6, 8]);
    }

    #[test]
    fn group_by_key_field_and_aggregates() {
        let result = run("SELECT val1, MAX(val2) AS hi, MIN(val2) AS lo, COUNT(*) AS n FROM test_table GROUP BY val1");
        assert_eq!(column_names(&result), vec!["val1", "hi", "lo", "n"]);

        let mut rows: Vec<(i64, i64, i64, i64)> = (0..result.num_rows)
            .map(|i| {
                let get = |name: &str| values(&result, name)[i].as_i64().unwrap();
                (get("val1"), get("hi"), get("lo"), get("n"))
            })
            .collect();
        rows.sort();
        assert_eq!(rows, vec![(1, 2, 1, 2), (2, 6, 6, 1), (4, 8, 8, 1), (8, 4, 4, 1)]);
    }

    #[test]
    fn group_by_alias_of_expression() {
        let result = run("SELECT val1 % 2 AS parity, COUNT(*) AS n FROM test_table GROUP BY parity");
        let mut rows: Vec<(i64, i64)> = (0..result.num_rows)
            .map(|i| (values(&result, "parity")[i].as_i64().unwrap(), values(&result, "n")[i].as_i64().unwrap()))
            .collect();
        rows.sort();
        assert_eq!(rows, vec![(0, 3), (1, 2)]);
    }

    #[test]
    fn non_key_fields_can_read_group_columns() {
        let result = run("SELECT val1 * 10 AS k, SUM(val2) AS s FROM test_table GROUP BY val1");
        let mut rows: Vec<(i64, i64)> = (0..result.num_rows)
            .map(|i| (values(&result, "k")[i].as_i64().unwrap(), values(&result, "s")[i].as_i64().unwrap()))
            .collect();
        rows.sort();
        assert_eq!(rows, vec![(10, 3), (20, 6), (40, 8), (80, 4)]);
    }

    #[test]
    fn group_by_result_ignores_input_order() {
        let query = "SELECT val1, SUM(val2) AS s, COUNT(*) AS n FROM test_table GROUP BY val1";
        let grouped = |engine: &QueryEngine| {
            let result = engine.evaluate_query(query).unwrap();
            let mut rows: Vec<(i64, i64, i64)> = (0..result.num_rows)
                .map(|i| {
                    let get = |name: &str| values(&result, name)[i].as_i64().unwrap();
                    (get("val1"), get("s"), get("n"))
                })
                .collect();
            rows.sort();
            rows
        };

        let forward = create_engine();
        let mut reversed = QueryEngine::new();
        reversed
            .load_json("test_table", json!([
                { "val1": 2, "val2": 6 },
                { "val1": 1, "val2": 1 },
                { "val1": 8, "val2": 4 },
                { "val1": 1, "val2": 2 },
                { "val1": 4, "val2": 8 }
            ]))
            .unwrap();

        assert_eq!(grouped(&forward), grouped(&reversed));
        assert_eq!(grouped(&forward), vec![(1, 3, 2), (2, 6, 1), (4, 8, 1), (8, 4, 1)]);
    }

    #[test]
    fn group_by_null_keys_form_one_group() {
        let result = run("SELECT foo, COUNT(*) AS n FROM null_table GROUP BY foo");
        let mut rows: Vec<(Option<i64>, i64)> = (0..result.num_rows)
            .map(|i| (values(&result, "foo")[i].as_i64(), values(&result, "n")[i].as_i64().unwrap()))
            .collect();
        rows.sort();
        assert_eq!(rows, vec![(None, 2), (Some(1), 1), (Some(5), 1)]);
    }

    #[test]
    fn aggregate_without_group_by_is_one_group() {
        let result = run("SELECT COUNT(*) AS n, SUM(val1) AS s, MAX(val2) + 1 AS m FROM test_table");
        assert_eq!(result.num_rows, 1);
        assert_eq!(values(&result, "n"), vec![json!(5)]);
        assert_eq!(values(&result, "s"), vec![json!(16)]);
        assert_eq!(values(&result, "m"), vec![json!(9)]);
    }

    #[test]
    fn aggregate_over_empty_input() {
        let result = run("SELECT COUNT(*) AS n, SUM(val1) AS s FROM test_table WHERE val1 > 100");
        assert_eq!(result.num_rows, 1);
        assert_eq!(values(&result, "n"), vec![json!(0)]);
        assert_eq!(values(&result, "s"), vec![Value::Null]);

        let mut engine = QueryEngine::with_config(Config::from("query_result", false));
        super::fixtures::create_test_table(&mut engine);
        let result = engine.evaluate_query("SELECT COUNT(*) AS n FROM test_table WHERE val1 > 100").unwrap();
        assert_eq!(result.num_rows, 0);
    }

    #[test]
    fn grouped_select_over_empty_input_has_no_rows() {
        let result = run("SELECT val1, COUNT(*) AS n FROM test_table WHERE val1 > 100 GROUP BY val1");
        assert_eq!(result.num_rows, 0);
        assert_eq!(column_names(&result), vec!["val1", "n"]);
    }

    #[test]
    fn count_distinct_and_average() {
        let result = run("SELECT COUNT(DISTINCT val1) AS d, SUM(val1) / COUNT(*) AS avg FROM test_table");
        assert_eq!(values(&result, "d"), vec![json!(4)]);
        assert_eq!(values(&result, "avg"), vec![json!(3.2)]);
    }

    #[test]
    fn join_on_equality() {
        let result = run("SELECT bar FROM test_table JOIN test_table_3 ON test_table.val1 = test_table_3.foo");
        assert_eq!(sorted_ints(values(&result, "bar")), vec![1, 1, 2, 2, 3, 7]);
    }

    #[test]
    fn join_star_uses_qualified_names() {
        let result = run("SELECT * FROM test_table JOIN test_table_2 ON test_table.val2 = test_table_2.val2");
        assert_eq!(
            column_names(&result),
            vec!["test_table.val1", "test_table.val2", "test_table_2.val3", "test_table_2.val2"]
        );
        assert_eq!(result.to_json_rows(), vec![json!({
            "test_table.val1": 1,
            "test_table.val2": 2,
            "test_table_2.val3": 3,
            "test_table_2.val2": 2
        })]);
    }

    #[test]
    fn join_chain_is_left_associative() {
        let result = run(
            "SELECT test_table_3.bar FROM test_table \
             JOIN test_table_2 ON test_table.val2 = test_table_2.val2 \
             JOIN test_table_3 ON test_table.val1 = test_table_3.foo",
        );
        assert_eq!(sorted_ints(values(&result, "test_table_3.bar")), vec![1, 2]);
    }

    #[test]
    fn join_with_aliases_and_aggregate() {
        let result = run("SELECT COUNT(*) AS n FROM test_table a JOIN test_table_3 b ON a.val1 = b.foo");
        assert_eq!(values(&result, "n"), vec![json!(6)]);
    }

    #[test]
    fn join_drops_null_matches() {
        let result = run("SELECT n.foo FROM null_table n JOIN test_table_3 t ON n.foo = t.foo");
        assert_eq!(sorted_ints(values(&result, "n.foo")), vec![1, 1, 5]);
    }

    #[test]
    fn ambiguous_short_name_in_join_fails() {
        let err = create_engine()
            .evaluate_query("SELECT val2 FROM test_table JOIN test_table_2 ON test_table.val2 = test_table_2.val2")
            .unwrap_err();
        assert_eq!(err, QueryError::Compile(CompileError::AmbiguousColumn("val2".into())));
    }

    #[test]
    fn comma_union_fills_missing_columns_with_null() {
        let result = run("SELECT val1, val3 FROM test_table, test_table_2");
        assert_eq!(result.num_rows, 7);
        let val1 = values(&result, "val1");
        let val3 = values(&result, "val3");
        assert_eq!(val1[..5], [json!(4), json!(1), json!(8), json!(1), json!(2)]);
        assert_eq!(val1[5..], [Value::Null, Value::Null]);
        assert_eq!(val3[..5], vec![Value::Null; 5][..]);
        assert_eq!(val3[5..], [json!(3), json!(8)]);
    }

    #[test]
    fn comma_union_with_all_null_column() {
        let mut engine = create_engine();
        engine.load_json("allnull", json!([{ "foo": null }, { "foo": null }])).unwrap();
        assert_eq!(engine.table_schema("allnull").unwrap()["foo"], DataType::Null);

        let result = engine.evaluate_query("SELECT foo FROM null_table, allnull").unwrap();
        assert_eq!(result.num_rows, 6);
        assert_eq!(result.column("foo").unwrap().ty, DataType::Int);
        assert_eq!(
            values(&result, "foo"),
            vec![json!(1), Value::Null, Value::Null, json!(5), Value::Null, Value::Null]
        );
    }

    #[test]
    fn comma_union_star_lists_columns_in_first_appearance_order() {
        let result = run("SELECT * FROM test_table, test_table_2");
        assert_eq!(column_names(&result), vec!["val1", "val2", "val3"]);
        assert_eq!(sorted_ints(values(&result, "val2")), vec![1, 2, 2, 4, 6, 7, 8]);
    }

    #[test]
    fn subquery_in_from() {
        let result = run("SELECT x FROM (SELECT val1 + 1 AS x FROM test_table)");
        assert_eq!(ints(values(&result, "x")), vec![5, 2, 9, 2, 3]);

        let result = run("SELECT s.x FROM (SELECT val1 AS x FROM test_table) s WHERE s.x > 1");
        assert_eq!(ints(values(&result, "s.x")), vec![4, 8, 2]);
    }

    #[test]
    fn join_against_subquery() {
        let result = run("SELECT t2.val FROM test_table t1 JOIN (SELECT 1 AS val) t2 ON t1.val1 = t2.val");
        assert_eq!(values(&result, "t2.val"), vec![json!(1), json!(1)]);
    }

    #[test]
    fn star_over_subquery_keeps_qualified_names_for_shared_columns() {
        let result = run("SELECT * FROM (SELECT * FROM test_table t1 JOIN test_table_2 t2 ON t1.val1 = t2.val3)");
        assert_eq!(column_names(&result), vec!["val1", "t1.val2", "val3", "t2.val2"]);
        assert_eq!(result.to_json_rows(), vec![json!({ "val1": 8, "t1.val2": 4, "val3": 8, "t2.val2": 7 })]);
    }

    #[test]
    fn grouped_subquery_feeds_outer_filter() {
        let result = run("SELECT k FROM (SELECT val1 AS k, COUNT(*) AS n FROM test_table GROUP BY k) WHERE n > 1");
        assert_eq!(ints(values(&result, "k")), vec![1]);
    }

    #[test]
    fn null_checks() {
        let result = run("SELECT foo IS NULL, foo IS NOT NULL FROM null_table");
        assert_eq!(values(&result, "f0_"), vec![json!(false), json!(true), json!(true), json!(false)]);
        assert_eq!(values(&result, "f1_"), vec![json!(true), json!(false), json!(false), json!(true)]);
    }

    #[test]
    fn nulls_propagate_through_arithmetic_and_comparison() {
        let result = run("SELECT foo + 1 AS a, foo > 1 AS b FROM null_table");
        assert_eq!(values(&result, "a"), vec![json!(2), Value::Null, Value::Null, json!(6)]);
        assert_eq!(values(&result, "b"), vec![json!(false), Value::Null, Value::Null, json!(true)]);
    }

    #[test]
    fn where_keeps_only_definitely_true_rows() {
        assert_eq!(ints(values(&run("SELECT foo FROM null_table WHERE foo > 1"), "foo")), vec![5]);
        assert_eq!(ints(values(&run("SELECT foo FROM null_table WHERE NOT foo > 1"), "foo")), vec![1]);
        assert_eq!(run("SELECT foo FROM null_table WHERE NULL").num_rows, 0);
    }

    #[test]
    fn three_valued_and_or() {
        let result = run("SELECT foo FROM null_table WHERE foo > 1 OR foo IS NULL");
        assert_eq!(values(&result, "foo"), vec![Value::Null, Value::Null, json!(5)]);

        let result = run("SELECT foo FROM null_table WHERE foo > 0 AND foo < 5");
        assert_eq!(values(&result, "foo"), vec![json!(1)]);
    }

    #[test]
    fn in_list() {
        assert_eq!(ints(values(&run("SELECT val1 FROM test_table WHERE val1 IN (1, 2)"), "val1")), vec![1, 1, 2]);
        assert_eq!(ints(values(&run("SELECT val1 FROM test_table WHERE val1 NOT IN (1, 2)"), "val1")), vec![4, 8]);
    }

    #[test]
    fn division_and_modulo() {
        let result = run("SELECT 7 / 2 AS q, 7 % 2 AS r, 1 / 0 AS z, -7 % 2 AS m");
        assert_eq!(values(&result, "q"), vec![json!(3.5)]);
        assert_eq!(values(&result, "r"), vec![json!(1)]);
        assert_eq!(values(&result, "z"), vec![Value::Null]);
        assert_eq!(values(&result, "m"), vec![json!(-1)]);
        assert_eq!(result.column("q").unwrap().ty, DataType::Float);
    }

    #[test]
    fn strings_compare_and_filter() {
        let result = run("SELECT str FROM string_table WHERE str = 'world'");
        assert_eq!(values(&result, "str"), vec![json!("world")]);

        let result = run("SELECT str FROM string_table WHERE str < \"i\"");
        assert_eq!(values(&result, "str"), vec![json!("hello")]);
    }

    #[test]
    fn scalar_functions() {
        let result = run("SELECT IF(val1 > 2, 'big', 'small') AS size FROM test_table");
        assert_eq!(
            values(&result, "size"),
            vec![json!("big"), json!("small"), json!("big"), json!("small"), json!("small")]
        );

        let result = run("SELECT ABS(-3) AS a, POW(2, 10) AS p");
        assert_eq!(values(&result, "a"), vec![json!(3)]);
        assert_eq!(values(&result, "p"), vec![json!(1024)]);
    }

    #[test]
    fn literals_broadcast_over_table_rows() {
        let result = run("SELECT 'x' AS tag, TRUE AS flag FROM test_table");
        assert_eq!(values(&result, "tag"), vec![json!("x"); 5]);
        assert_eq!(values(&result, "flag"), vec![json!(true); 5]);
    }

    #[test]
    fn output_types_follow_expressions() {
        let result = run("SELECT val1, val1 > 1 AS big, str FROM test_table, string_table");
        assert_eq!(result.column("val1").unwrap().ty, DataType::Int);
        assert_eq!(result.column("big").unwrap().ty, DataType::Bool);
        assert_eq!(result.column("str").unwrap().ty, DataType::String);
        assert_eq!(result.num_rows, 7);
    }

    #[test]
    fn compile_errors_surface_before_evaluation() {
        let engine = create_engine();
        let err = |q: &str| engine.evaluate_query(q).unwrap_err();

        assert_eq!(err("SELECT nope FROM test_table"), QueryError::Compile(CompileError::UnknownColumn("nope".into())));
        assert_eq!(err("SELECT 1 FROM missing"), QueryError::Compile(CompileError::UnknownTable("missing".into())));
        assert!(matches!(
            err("SELECT val1 FROM test_table GROUP BY nope"),
            QueryError::Compile(CompileError::InvalidGroupBy(_))
        ));
        assert!(matches!(err("SELECT val1, COUNT(*) FROM test_table"), QueryError::Compile(CompileError::UnknownColumn(_))));
        assert!(matches!(err("SELECT val1 + 'a' FROM test_table"), QueryError::Compile(CompileError::FunctionArgMismatch { .. })));
        assert!(matches!(err("SELECT val1 FROM test_table WHERE val1"), QueryError::Compile(CompileError::NonBooleanPredicate(_))));
    }

    #[test]
    fn lex_and_parse_errors() {
        let engine = create_engine();
        assert!(matches!(engine.evaluate_query("SELECT @ FROM test_table"), Err(QueryError::Lex(_))));
        assert!(matches!(engine.evaluate_query("SELECT val1 FROM"), Err(QueryError::Parse(_))));
        assert!(matches!(engine.evaluate_query("SELECT (1 + 2"), Err(QueryError::Parse(_))));
    }
}
