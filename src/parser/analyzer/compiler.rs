use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    QueryError,
    database::{DataType, SchemaProvider},
    parser::{
        QueryParser,
        analyzer::{
            AggregateResolver, AliasResolver, CompileError, GroupByResolver, GroupSet, TypeContext, TypedExpr,
            TypedSelect, TypedSelectField, TypedTableExpr, WildcardResolver,
        },
        ast::{Expr, FunctionCall, Select, SelectField, TableExpr},
    },
    runtime::{FunctionHandle, FunctionRegistry},
};

/// Binds an untyped [`Select`] against table schemas and the function
/// registry, producing a [`TypedSelect`].
pub struct Compiler<'a> {
    schemas: &'a dyn SchemaProvider,
    registry: &'a FunctionRegistry,
}

impl<'a> Compiler<'a> {
    pub fn new(schemas: &'a dyn SchemaProvider, registry: &'a FunctionRegistry) -> Self {
        Self { schemas, registry }
    }

    /// Lex, parse and compile query text.
    pub fn compile_text(&self, text: &str) -> Result<TypedSelect, QueryError> {
        let select = QueryParser::parse_text(text)?;
        Ok(self.compile_select(&select)?)
    }

    pub fn compile_select(&self, select: &Select) -> Result<TypedSelect, CompileError> {
        let table = match &select.table {
            Some(table_expr) => self.compile_table_expr(table_expr)?,
            None => TypedTableExpr::NoTable { type_ctx: TypeContext::default() },
        };
        let table_ctx = table.type_ctx().clone();

        let fields = WildcardResolver::expand_projection(&select.fields, &table)?;
        let aliases = AliasResolver::field_aliases(&fields)?;
        let is_aggregate_select =
            fields.iter().any(|f| AggregateResolver::contains_aggregate(&f.expr, self.registry));

        let (select_fields, group_set) = match &select.groups {
            Some(groups) => self.compile_grouped_fields(&fields, &aliases, groups, &table_ctx)?,
            // aggregate select without GROUP BY: one implicit group, table
            // columns only visible inside aggregate arguments
            None if is_aggregate_select => {
                let field_ctx = TypeContext::with_aggregate(table_ctx.clone());
                (self.compile_fields(&fields, &aliases, &field_ctx)?, Some(GroupSet::default()))
            }
            None => (self.compile_fields(&fields, &aliases, &table_ctx)?, None),
        };

        let where_expr = match &select.where_expr {
            Some(expr) => Some(self.compile_predicate(expr, &table_ctx)?),
            None => None,
        };

        let output_columns: IndexMap<String, DataType> =
            select_fields.iter().map(|f| (f.alias.clone(), f.expr.ty())).collect();
        debug!(fields = ?aliases, grouped = group_set.is_some(), "compiled select");

        Ok(TypedSelect {
            select_fields,
            table,
            where_expr,
            group_set,
            type_ctx: TypeContext::from_full_columns(output_columns, None),
        })
    }

    fn compile_fields(
        &self,
        fields: &[SelectField],
        aliases: &[String],
        ctx: &TypeContext,
    ) -> Result<Vec<TypedSelectField>, CompileError> {
        fields
            .iter()
            .zip(aliases)
            .map(|(field, alias)| self.compile_select_field(&field.expr, alias, ctx))
            .collect()
    }

    /// Key fields (those named by an alias group) are compiled against the
    /// table scope. Every other field sees only the group key columns, plus
    /// the table scope inside aggregate arguments.
    fn compile_grouped_fields(
        &self,
        fields: &[SelectField],
        aliases: &[String],
        groups: &[String],
        table_ctx: &TypeContext,
    ) -> Result<(Vec<TypedSelectField>, Option<GroupSet>), CompileError> {
        let (alias_groups, field_groups) = GroupByResolver::partition(groups, aliases, table_ctx)?;

        let mut key_fields: HashMap<&str, TypedSelectField> = HashMap::new();
        for (field, alias) in fields.iter().zip(aliases) {
            if alias_groups.contains(alias) {
                key_fields.insert(alias.as_str(), self.compile_select_field(&field.expr, alias, table_ctx)?);
            }
        }

        let mut group_columns: IndexMap<String, DataType> =
            field_groups.iter().map(|c| (c.column.clone(), c.ty)).collect();
        for alias in &alias_groups {
            if let Some(field) = key_fields.get(alias.as_str()) {
                group_columns.insert(alias.clone(), field.expr.ty());
            }
        }
        let group_ctx = TypeContext::from_full_columns(group_columns, Some(table_ctx.clone()));

        let mut select_fields = Vec::with_capacity(fields.len());
        for (field, alias) in fields.iter().zip(aliases) {
            match key_fields.remove(alias.as_str()) {
                Some(key_field) => select_fields.push(key_field),
                None => select_fields.push(self.compile_select_field(&field.expr, alias, &group_ctx)?),
            }
        }

        Ok((select_fields, Some(GroupSet { alias_groups, field_groups })))
    }

    fn compile_select_field(&self, expr: &Expr, alias: &str, ctx: &TypeContext) -> Result<TypedSelectField, CompileError> {
        Ok(TypedSelectField { expr: self.compile_expr(expr, ctx)?, alias: alias.to_string() })
    }

    /// WHERE and JOIN ... ON expressions must be boolean (or the NULL literal).
    fn compile_predicate(&self, expr: &Expr, ctx: &TypeContext) -> Result<TypedExpr, CompileError> {
        let compiled = self.compile_expr(expr, ctx)?;
        if compiled.ty().is_bool_or_null() {
            Ok(compiled)
        } else {
            Err(CompileError::NonBooleanPredicate(compiled.ty()))
        }
    }

    pub fn compile_table_expr(&self, table_expr: &TableExpr) -> Result<TypedTableExpr, CompileError> {
        match table_expr {
            TableExpr::Table { name, alias } => {
                let schema = self.schemas.schema_of(name).ok_or_else(|| CompileError::UnknownTable(name.clone()))?;
                let qualifier = alias.as_deref().unwrap_or(name);
                Ok(TypedTableExpr::Table { name: name.clone(), type_ctx: TypeContext::for_table(qualifier, &schema) })
            }
            TableExpr::Subquery { select, alias } => {
                let compiled = self.compile_select(select)?;
                let type_ctx = match alias {
                    Some(alias) => compiled.type_ctx.requalify(alias)?,
                    None => compiled.type_ctx.clone(),
                };
                Ok(TypedTableExpr::Subquery { select: Box::new(compiled), type_ctx })
            }
            TableExpr::Join { left, right, condition } => {
                let left = self.compile_table_expr(left)?;
                let right = self.compile_table_expr(right)?;
                let type_ctx = TypeContext::join(left.type_ctx(), right.type_ctx())?;
                let condition = self.compile_predicate(condition, &type_ctx)?;
                Ok(TypedTableExpr::Join { left: Box::new(left), right: Box::new(right), condition, type_ctx })
            }
            TableExpr::Union(tables) => {
                let tables = tables
                    .iter()
                    .map(|t| self.compile_table_expr(t))
                    .collect::<Result<Vec<_>, _>>()?;
                let type_ctx = TypeContext::union_contexts(tables.iter().map(TypedTableExpr::type_ctx))?;
                Ok(TypedTableExpr::Union { tables, type_ctx })
            }
        }
    }

    pub fn compile_expr(&self, expr: &Expr, ctx: &TypeContext) -> Result<TypedExpr, CompileError> {
        match expr {
            Expr::Literal(lit) => Ok(TypedExpr::Literal { value: lit.to_value(), ty: lit.data_type() }),
            Expr::Column(name) => Ok(TypedExpr::ColumnRef(ctx.column_ref_for_name(name)?)),
            Expr::Star => Err(CompileError::MisplacedWildcard),
            Expr::Unary { op, expr } => {
                let func = self.registry.unary_op(*op).ok_or_else(|| CompileError::FunctionNotFound(op.to_string()))?;
                let arg = self.compile_expr(expr, ctx)?;
                Self::call(func, vec![arg])
            }
            Expr::Binary { op, left, right } => {
                let func = self.registry.binary_op(*op).ok_or_else(|| CompileError::FunctionNotFound(op.to_string()))?;
                let left = self.compile_expr(left, ctx)?;
                let right = self.compile_expr(right, ctx)?;
                Self::call(func, vec![left, right])
            }
            Expr::InList { expr, list } => {
                let mut args = vec![self.compile_expr(expr, ctx)?];
                for item in list {
                    args.push(self.compile_expr(item, ctx)?);
                }
                Self::call(self.registry.in_list(), args)
            }
            Expr::Function(call) => self.compile_function_call(call, ctx),
        }
    }

    fn call(func: FunctionHandle, args: Vec<TypedExpr>) -> Result<TypedExpr, CompileError> {
        let arg_types: Vec<DataType> = args.iter().map(TypedExpr::ty).collect();
        let ty = func.check_types(&arg_types)?;
        Ok(TypedExpr::FunctionCall { func, args, ty })
    }

    fn compile_function_call(&self, call: &FunctionCall, ctx: &TypeContext) -> Result<TypedExpr, CompileError> {
        let func = self.resolve_function(call)?;

        let count_star;
        let args: &[Expr] = match call.args.as_slice() {
            [Expr::Star] if func.name() == "count" => {
                count_star = [Expr::int(1)];
                &count_star
            }
            args => args,
        };

        if !func.is_aggregate() {
            let args = args.iter().map(|a| self.compile_expr(a, ctx)).collect::<Result<Vec<_>, _>>()?;
            return Self::call(func, args);
        }

        // Only innermost aggregates switch scope; an aggregate over an
        // aggregate has no scope to switch to.
        if AggregateResolver::args_contain_aggregate(args, self.registry) {
            return Err(CompileError::UnexpectedAggregate(call.name.clone()));
        }
        let aggregate_ctx = ctx
            .aggregate_context
            .as_deref()
            .ok_or_else(|| CompileError::UnexpectedAggregate(call.name.clone()))?;

        let args = args.iter().map(|a| self.compile_expr(a, aggregate_ctx)).collect::<Result<Vec<_>, _>>()?;
        let arg_types: Vec<DataType> = args.iter().map(TypedExpr::ty).collect();
        let ty = func.check_types(&arg_types)?;
        Ok(TypedExpr::AggregateCall { func, args, ty })
    }

    fn resolve_function(&self, call: &FunctionCall) -> Result<FunctionHandle, CompileError> {
        let name = call.name.to_ascii_lowercase();
        if call.distinct {
            if name != "count" {
                return Err(CompileError::DistinctNotSupported(call.name.clone()));
            }
            return self.registry.get("count_distinct").ok_or(CompileError::FunctionNotFound(name));
        }
        self.registry.get(&name).ok_or(CompileError::FunctionNotFound(call.name.clone()))
    }
}
