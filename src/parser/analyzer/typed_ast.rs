use std::collections::BTreeSet;

use serde_json::Value;

use crate::{
    database::DataType,
    parser::analyzer::TypeContext,
    runtime::FunctionHandle,
};

/// A resolved column: qualified name plus type.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub column: String,
    pub ty: DataType,
}

impl ColumnRef {
    pub fn new(column: &str, ty: DataType) -> Self {
        Self { column: column.to_string(), ty }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExpr {
    Literal { value: Value, ty: DataType },
    ColumnRef(ColumnRef),
    FunctionCall { func: FunctionHandle, args: Vec<TypedExpr>, ty: DataType },
    /// Innermost aggregate: its arguments are evaluated in aggregate scope.
    AggregateCall { func: FunctionHandle, args: Vec<TypedExpr>, ty: DataType },
}

impl TypedExpr {
    pub fn ty(&self) -> DataType {
        match self {
            TypedExpr::Literal { ty, .. } => *ty,
            TypedExpr::ColumnRef(c) => c.ty,
            TypedExpr::FunctionCall { ty, .. } => *ty,
            TypedExpr::AggregateCall { ty, .. } => *ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedSelectField {
    pub expr: TypedExpr,
    pub alias: String,
}

/// Grouping keys: `field_groups` are source columns, `alias_groups` name
/// select fields whose values form part of the key. Both empty means one
/// implicit group over the whole input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSet {
    pub alias_groups: BTreeSet<String>,
    pub field_groups: Vec<ColumnRef>,
}

impl GroupSet {
    pub fn is_implicit(&self) -> bool {
        self.alias_groups.is_empty() && self.field_groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedTableExpr {
    NoTable { type_ctx: TypeContext },
    Table { name: String, type_ctx: TypeContext },
    Join { left: Box<TypedTableExpr>, right: Box<TypedTableExpr>, condition: TypedExpr, type_ctx: TypeContext },
    Union { tables: Vec<TypedTableExpr>, type_ctx: TypeContext },
    Subquery { select: Box<TypedSelect>, type_ctx: TypeContext },
}

impl TypedTableExpr {
    pub fn type_ctx(&self) -> &TypeContext {
        match self {
            TypedTableExpr::NoTable { type_ctx }
            | TypedTableExpr::Table { type_ctx, .. }
            | TypedTableExpr::Join { type_ctx, .. }
            | TypedTableExpr::Union { type_ctx, .. }
            | TypedTableExpr::Subquery { type_ctx, .. } => type_ctx,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedSelect {
    pub select_fields: Vec<TypedSelectField>,
    pub table: TypedTableExpr,
    pub where_expr: Option<TypedExpr>,
    pub group_set: Option<GroupSet>,
    /// Output columns keyed by alias.
    pub type_ctx: TypeContext,
}
