use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    database::{Column, Config, TableProvider},
    executor::{Context, ContextBuilder, GroupKey},
    parser::analyzer::{GroupSet, TypeContext, TypedExpr, TypedSelect, TypedSelectField, TypedTableExpr},
    runtime::{RuntimeError, Truth},
};

/// Which columns an expression reads: the row context itself, or the
/// aggregate context attached to it (only inside aggregate arguments).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Row,
    Aggregate,
}

/// Rows of one group: the key values and the member row indexes.
struct Bucket {
    key_values: Vec<Value>,
    rows: Vec<usize>,
}

pub struct Evaluator<'a> {
    tables: &'a dyn TableProvider,
    config: &'a Config,
}

impl<'a> Evaluator<'a> {
    pub fn new(tables: &'a dyn TableProvider, config: &'a Config) -> Self {
        Self { tables, config }
    }

    pub fn evaluate_select(&self, select: &TypedSelect) -> Result<Context, RuntimeError> {
        let source = self.evaluate_table_expr(&select.table)?;

        let filtered = match &select.where_expr {
            Some(predicate) => self.filter(source, predicate)?,
            None => source,
        };

        let result = match &select.group_set {
            Some(group_set) => self.evaluate_groups(&select.select_fields, group_set, &filtered)?,
            None => self.project(&select.select_fields, &filtered)?,
        };

        debug!(rows = result.num_rows, columns = result.columns.len(), "evaluated select");
        Ok(result)
    }

    pub fn evaluate_table_expr(&self, table_expr: &TypedTableExpr) -> Result<Context, RuntimeError> {
        let context = match table_expr {
            TypedTableExpr::NoTable { .. } => Context::empty_row(),
            TypedTableExpr::Table { name, type_ctx } => {
                let table = self
                    .tables
                    .table(name)
                    .ok_or_else(|| RuntimeError::new(format!("table {} is not loaded", name)))?;
                Context::from_table(table, type_ctx)?
            }
            TypedTableExpr::Join { left, right, condition, type_ctx } => {
                self.evaluate_join(left, right, condition, type_ctx)?
            }
            TypedTableExpr::Union { tables, type_ctx } => {
                let mut builder = ContextBuilder::from_type_context(type_ctx);
                for table in tables {
                    builder.append_by_short_name(&self.evaluate_table_expr(table)?);
                }
                builder.finish()
            }
            TypedTableExpr::Subquery { select, type_ctx } => self.evaluate_select(select)?.renamed(type_ctx)?,
        };

        trace!(rows = context.num_rows, "evaluated table expression");
        Ok(context)
    }

    /// Evaluate `expr` for every row of the scope it reads, returning one
    /// value per row.
    pub fn evaluate_expr(&self, expr: &TypedExpr, ctx: &Context, scope: Scope) -> Result<Vec<Value>, RuntimeError> {
        let active = match scope {
            Scope::Row => ctx,
            Scope::Aggregate => ctx
                .aggregate_context
                .as_deref()
                .ok_or_else(|| RuntimeError::new("aggregate scope is not available"))?,
        };

        match expr {
            TypedExpr::Literal { value, .. } => Ok(vec![value.clone(); active.num_rows]),
            TypedExpr::ColumnRef(column_ref) => active
                .column(&column_ref.column)
                .map(|column| column.values.clone())
                .ok_or_else(|| RuntimeError::new(format!("column {} not found in context", column_ref.column))),
            TypedExpr::FunctionCall { func, args, .. } => {
                let args = self.evaluate_args(args, ctx, scope)?;
                func.evaluate(active.num_rows, &args)
            }
            TypedExpr::AggregateCall { func, args, .. } => {
                if scope == Scope::Aggregate {
                    return RuntimeError::new(format!("aggregate {} nested in aggregate arguments", func.name())).err();
                }
                let args = self.evaluate_args(args, ctx, Scope::Aggregate)?;
                func.evaluate(ctx.num_rows, &args)
            }
        }
    }

    fn evaluate_args(&self, args: &[TypedExpr], ctx: &Context, scope: Scope) -> Result<Vec<Column>, RuntimeError> {
        args.iter()
            .map(|arg| Ok(Column::new(arg.ty(), self.evaluate_expr(arg, ctx, scope)?)))
            .collect()
    }

    /// Keep the rows where `predicate` is definitely true.
    fn filter(&self, ctx: Context, predicate: &TypedExpr) -> Result<Context, RuntimeError> {
        let mask: Vec<bool> = self
            .evaluate_expr(predicate, &ctx, Scope::Row)?
            .iter()
            .map(|v| Truth::from_value(v).is_true())
            .collect();
        let filtered = ctx.mask(&mask)?;
        debug!(before = ctx.num_rows, after = filtered.num_rows, "applied where");
        Ok(filtered)
    }

    fn project(&self, fields: &[TypedSelectField], ctx: &Context) -> Result<Context, RuntimeError> {
        let mut columns = IndexMap::with_capacity(fields.len());
        for field in fields {
            let values = self.evaluate_expr(&field.expr, ctx, Scope::Row)?;
            columns.insert(field.alias.clone(), Column::new(field.expr.ty(), values));
        }
        Context::new(ctx.num_rows, columns, None)
    }

    /// Nested loop: each left row is broadcast against the whole right side
    /// and the pairs where the condition is definitely true are kept.
    fn evaluate_join(
        &self,
        left: &TypedTableExpr,
        right: &TypedTableExpr,
        condition: &TypedExpr,
        type_ctx: &TypeContext,
    ) -> Result<Context, RuntimeError> {
        let left = self.evaluate_table_expr(left)?;
        let right = self.evaluate_table_expr(right)?;

        let mut builder = ContextBuilder::from_type_context(type_ctx);
        for i in 0..left.num_rows {
            let probe = left.broadcast_row(i, &right)?;
            let matches = self.evaluate_expr(condition, &probe, Scope::Row)?;
            for (j, value) in matches.iter().enumerate() {
                if Truth::from_value(value).is_true() {
                    builder.push_row(&probe, j)?;
                }
            }
        }

        debug!(left = left.num_rows, right = right.num_rows, matched = builder.num_rows(), "evaluated join");
        Ok(builder.finish())
    }

    fn evaluate_groups(
        &self,
        fields: &[TypedSelectField],
        group_set: &GroupSet,
        ctx: &Context,
    ) -> Result<Context, RuntimeError> {
        let key_columns = self.group_key_columns(fields, group_set, ctx)?;

        let mut buckets: IndexMap<GroupKey, Bucket> = IndexMap::new();
        for row in 0..ctx.num_rows {
            let key_values: Vec<Value> = key_columns.iter().map(|(_, column)| column.values[row].clone()).collect();
            let key = GroupKey::from_values(&key_values);
            buckets.entry(key).or_insert_with(|| Bucket { key_values, rows: Vec::new() }).rows.push(row);
        }
        if buckets.is_empty() && group_set.is_implicit() && self.config.implicit_group_on_empty {
            buckets.insert(GroupKey::default(), Bucket { key_values: Vec::new(), rows: Vec::new() });
        }
        debug!(rows = ctx.num_rows, groups = buckets.len(), "grouped rows");

        let mut builder = ContextBuilder::from_columns(fields.iter().map(|f| (f.alias.as_str(), f.expr.ty())));
        for bucket in buckets.into_values() {
            let members = ctx.select_rows(&bucket.rows)?;
            let columns = key_columns
                .iter()
                .zip(bucket.key_values)
                .map(|((name, column), value)| (name.clone(), Column::new(column.ty, vec![value])))
                .collect();
            let group_ctx = Context::new(1, columns, Some(members))?;

            let mut row = Vec::with_capacity(fields.len());
            for field in fields {
                let values = if group_set.alias_groups.contains(&field.alias) {
                    group_ctx.column(&field.alias).map(|c| c.values.clone()).unwrap_or_default()
                } else {
                    self.evaluate_expr(&field.expr, &group_ctx, Scope::Row)?
                };
                row.push(values.into_iter().next().unwrap_or(Value::Null));
            }
            builder.push_values(row)?;
        }

        Ok(builder.finish())
    }

    /// Key columns over the whole input: source columns first, then the
    /// alias-group select fields in sorted alias order.
    fn group_key_columns(
        &self,
        fields: &[TypedSelectField],
        group_set: &GroupSet,
        ctx: &Context,
    ) -> Result<Vec<(String, Column)>, RuntimeError> {
        let mut key_columns = Vec::with_capacity(group_set.field_groups.len() + group_set.alias_groups.len());
        for column_ref in &group_set.field_groups {
            let column = ctx
                .column(&column_ref.column)
                .ok_or_else(|| RuntimeError::new(format!("group column {} not found", column_ref.column)))?;
            key_columns.push((column_ref.column.clone(), column.clone()));
        }
        for alias in &group_set.alias_groups {
            let field = fields
                .iter()
                .find(|f| &f.alias == alias)
                .ok_or_else(|| RuntimeError::new(format!("group alias {} not found", alias)))?;
            let values = self.evaluate_expr(&field.expr, ctx, Scope::Row)?;
            key_columns.push((alias.clone(), Column::new(field.expr.ty(), values)));
        }
        Ok(key_columns)
    }
}
