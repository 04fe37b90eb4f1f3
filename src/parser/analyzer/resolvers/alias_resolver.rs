use std::collections::HashSet;

use crate::parser::{analyzer::CompileError, ast::{Expr, SelectField}};

pub struct AliasResolver;

impl AliasResolver {
    /// Explicit alias, else the identifier as written for a bare column.
    pub fn proposed_alias(field: &SelectField) -> Option<String> {
        match (&field.alias, &field.expr) {
            (Some(alias), _) => Some(alias.clone()),
            (None, Expr::Column(name)) => Some(name.clone()),
            _ => None,
        }
    }

    /// Output names for every field. Remaining fields get `f0_`, `f1_`, ...
    /// skipping names already taken; two equal proposed names are an error.
    pub fn field_aliases(fields: &[SelectField]) -> Result<Vec<String>, CompileError> {
        let proposed: Vec<Option<String>> = fields.iter().map(Self::proposed_alias).collect();

        let mut used = HashSet::new();
        for alias in proposed.iter().flatten() {
            if !used.insert(alias.clone()) {
                return Err(CompileError::DuplicateAlias(alias.clone()));
            }
        }

        let mut generic = 0;
        let mut result = Vec::with_capacity(fields.len());
        for alias in proposed {
            match alias {
                Some(alias) => result.push(alias),
                None => {
                    while used.contains(&format!("f{}_", generic)) {
                        generic += 1;
                    }
                    result.push(format!("f{}_", generic));
                    generic += 1;
                }
            }
        }
        Ok(result)
    }
}
