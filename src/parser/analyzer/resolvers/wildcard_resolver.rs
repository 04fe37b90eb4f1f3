use crate::parser::{
    analyzer::{CompileError, TypeContext, TypedTableExpr},
    ast::{Expr, SelectField},
};

pub struct WildcardResolver;

impl WildcardResolver {
    /// Fields standing for `*`: short names for a single source, qualified
    /// names for a join. A short name shared by two columns keeps the
    /// qualified name.
    pub fn expand_wildcard(table: &TypedTableExpr) -> Vec<SelectField> {
        let qualified = matches!(table, TypedTableExpr::Join { .. });
        let type_ctx = table.type_ctx();
        type_ctx
            .columns
            .keys()
            .map(|full_name| {
                let short_name = TypeContext::short_column_name(full_name);
                let alias =
                    if qualified || type_ctx.ambig_aliases.contains(short_name) { full_name.as_str() } else { short_name };
                SelectField { expr: Expr::Column(full_name.clone()), alias: Some(alias.to_string()) }
            })
            .collect()
    }

    /// Expand a whole projection that may contain `*` fields.
    pub fn expand_projection(fields: &[SelectField], table: &TypedTableExpr) -> Result<Vec<SelectField>, CompileError> {
        let mut result = Vec::new();
        for field in fields {
            match (&field.expr, &field.alias) {
                (Expr::Star, None) => result.extend(Self::expand_wildcard(table)),
                (Expr::Star, Some(_)) => return Err(CompileError::MisplacedWildcard),
                _ => result.push(field.clone()),
            }
        }
        Ok(result)
    }
}
