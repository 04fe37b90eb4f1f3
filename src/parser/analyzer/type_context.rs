use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::{
    database::{DataType, Schema},
    parser::analyzer::{ColumnRef, CompileError},
};

/// Compile-time view of the columns visible in one scope.
///
/// `columns` are keyed by fully-qualified name (`table.col`), except for
/// union and select outputs which only carry short names. `aliases` maps an
/// unambiguous short name to its qualified name; a short name defined under
/// two qualifiers lands in `ambig_aliases` instead and fails to resolve.
/// `aggregate_context`, when set, is the scope entered by the arguments of
/// an aggregate function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeContext {
    pub columns: IndexMap<String, DataType>,
    pub aliases: HashMap<String, String>,
    pub ambig_aliases: HashSet<String>,
    pub aggregate_context: Option<Box<TypeContext>>,
}

impl TypeContext {
    /// Fill in alias information for the given columns.
    pub fn from_full_columns(columns: IndexMap<String, DataType>, aggregate_context: Option<TypeContext>) -> Self {
        let mut aliases = HashMap::new();
        let mut ambig_aliases = HashSet::new();

        for full_name in columns.keys() {
            let short_name = Self::short_column_name(full_name);
            if short_name == full_name || ambig_aliases.contains(short_name) {
                continue;
            }
            if aliases.remove(short_name).is_some() {
                ambig_aliases.insert(short_name.to_string());
            } else {
                aliases.insert(short_name.to_string(), full_name.clone());
            }
        }

        Self { columns, aliases, ambig_aliases, aggregate_context: aggregate_context.map(Box::new) }
    }

    /// Columns of a base table, qualified by the table name or its alias.
    pub fn for_table(qualifier: &str, schema: &Schema) -> Self {
        let columns = schema.iter().map(|(name, ty)| (format!("{}.{}", qualifier, name), *ty)).collect();
        Self::from_full_columns(columns, None)
    }

    /// Scope with no columns of its own where aggregate arguments see
    /// `table_ctx`: the select-field scope of an aggregate select.
    pub fn with_aggregate(table_ctx: TypeContext) -> Self {
        Self { aggregate_context: Some(Box::new(table_ctx)), ..Self::default() }
    }

    /// Comma-operator semantics: short names only, in first-appearance
    /// order; a name seen twice takes the promoted type of both sides
    /// (a column typed NULL yields to the other).
    pub fn union_contexts<'a>(contexts: impl IntoIterator<Item = &'a TypeContext>) -> Result<Self, CompileError> {
        let mut columns: IndexMap<String, DataType> = IndexMap::new();
        for context in contexts {
            for (full_name, ty) in &context.columns {
                let short_name = Self::short_column_name(full_name);
                match columns.get_mut(short_name) {
                    Some(existing) => {
                        let left = *existing;
                        *existing = DataType::promote(left, *ty).ok_or_else(|| CompileError::IncompatibleUnion {
                            column: short_name.to_string(),
                            left,
                            right: *ty,
                        })?;
                    }
                    None => {
                        columns.insert(short_name.to_string(), *ty);
                    }
                }
            }
        }
        Ok(Self { columns, ..Self::default() })
    }

    /// Qualified columns of both sides; short names defined on both sides
    /// become ambiguous.
    pub fn join(left: &TypeContext, right: &TypeContext) -> Result<Self, CompileError> {
        let mut columns = left.columns.clone();
        for (name, ty) in &right.columns {
            if columns.insert(name.clone(), *ty).is_some() {
                return Err(CompileError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self::from_full_columns(columns, None))
    }

    /// Re-qualify every column under `alias` (`FROM (SELECT ...) alias`).
    pub fn requalify(&self, alias: &str) -> Result<Self, CompileError> {
        let mut columns = IndexMap::new();
        for (name, ty) in &self.columns {
            let full_name = format!("{}.{}", alias, Self::short_column_name(name));
            if columns.insert(full_name.clone(), *ty).is_some() {
                return Err(CompileError::DuplicateColumn(full_name));
            }
        }
        Ok(Self::from_full_columns(columns, None))
    }

    pub fn short_column_name(full_name: &str) -> &str {
        full_name.rsplit_once('.').map(|(_, short)| short).unwrap_or(full_name)
    }

    /// Resolve a name as written to its column: exact qualified match first,
    /// then an unambiguous short alias.
    pub fn column_ref_for_name(&self, name: &str) -> Result<ColumnRef, CompileError> {
        if let Some(ty) = self.columns.get(name) {
            return Ok(ColumnRef::new(name, *ty));
        }
        if let Some(full_name) = self.aliases.get(name) {
            let ty = self.columns.get(full_name).copied().unwrap_or(DataType::Null);
            return Ok(ColumnRef::new(full_name, ty));
        }
        if self.ambig_aliases.contains(name) {
            return Err(CompileError::AmbiguousColumn(name.to_string()));
        }
        Err(CompileError::UnknownColumn(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(cols: &[(&str, DataType)]) -> Schema {
        cols.iter().map(|(n, t)| (n.to_string(), *t)).collect()
    }

    #[test]
    fn table_columns_resolve_by_short_and_full_name() {
        let ctx = TypeContext::for_table("t", &schema(&[("a", DataType::Int), ("b", DataType::String)]));
        assert_eq!(ctx.column_ref_for_name("a").unwrap(), ColumnRef::new("t.a", DataType::Int));
        assert_eq!(ctx.column_ref_for_name("t.b").unwrap(), ColumnRef::new("t.b", DataType::String));
        assert_eq!(ctx.column_ref_for_name("c"), Err(CompileError::UnknownColumn("c".into())));
    }

    #[test]
    fn join_marks_shared_short_names_ambiguous() {
        let left = TypeContext::for_table("t1", &schema(&[("val1", DataType::Int), ("val2", DataType::Int)]));
        let right = TypeContext::for_table("t2", &schema(&[("val3", DataType::Int), ("val2", DataType::Int)]));
        let ctx = TypeContext::join(&left, &right).unwrap();

        let names: Vec<_> = ctx.columns.keys().cloned().collect();
        assert_eq!(names, vec!["t1.val1", "t1.val2", "t2.val3", "t2.val2"]);
        assert_eq!(ctx.column_ref_for_name("val2"), Err(CompileError::AmbiguousColumn("val2".into())));
        assert_eq!(ctx.column_ref_for_name("t2.val2").unwrap().column, "t2.val2");
        assert_eq!(ctx.column_ref_for_name("val3").unwrap().column, "t2.val3");
    }

    #[test]
    fn self_join_without_alias_is_rejected() {
        let t = TypeContext::for_table("t", &schema(&[("a", DataType::Int)]));
        assert_eq!(TypeContext::join(&t, &t), Err(CompileError::DuplicateColumn("t.a".into())));
    }

    #[test]
    fn union_uses_short_names_in_first_appearance_order() {
        let a = TypeContext::for_table("a", &schema(&[("val1", DataType::Int), ("val2", DataType::Int)]));
        let b = TypeContext::for_table("b", &schema(&[("val3", DataType::Int), ("val2", DataType::Int)]));
        let ctx = TypeContext::union_contexts([&a, &b]).unwrap();
        let names: Vec<_> = ctx.columns.keys().cloned().collect();
        assert_eq!(names, vec!["val1", "val2", "val3"]);

        let c = TypeContext::for_table("c", &schema(&[("val1", DataType::String)]));
        assert_eq!(
            TypeContext::union_contexts([&a, &c]),
            Err(CompileError::IncompatibleUnion { column: "val1".into(), left: DataType::Int, right: DataType::String })
        );
    }

    #[test]
    fn union_promotes_null_and_numeric_columns() {
        let a = TypeContext::for_table("a", &schema(&[("foo", DataType::Null), ("bar", DataType::Int)]));
        let b = TypeContext::for_table("b", &schema(&[("foo", DataType::Int), ("bar", DataType::Float)]));
        let ctx = TypeContext::union_contexts([&a, &b]).unwrap();
        assert_eq!(ctx.columns["foo"], DataType::Int);
        assert_eq!(ctx.columns["bar"], DataType::Float);
    }

    #[test]
    fn requalify_moves_columns_under_alias() {
        let ctx = TypeContext::from_full_columns(schema(&[("foo", DataType::Int)]), None);
        let ctx = ctx.requalify("t2").unwrap();
        assert_eq!(ctx.column_ref_for_name("foo").unwrap().column, "t2.foo");
    }
}
