use std::fmt;

use crate::parser::ast::{Expr, TableExpr};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectField {
    pub expr: Expr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub fields: Vec<SelectField>,
    pub table: Option<TableExpr>,
    pub where_expr: Option<Expr>,
    /// GROUP BY names: select-field aliases or column names.
    pub groups: Option<Vec<String>>,
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field.expr)?;
            if let Some(alias) = &field.alias {
                write!(f, " AS {}", alias)?;
            }
        }
        if let Some(table) = &self.table {
            write!(f, " FROM {}", table)?;
        }
        if let Some(where_expr) = &self.where_expr {
            write!(f, " WHERE {}", where_expr)?;
        }
        if let Some(groups) = &self.groups {
            write!(f, " GROUP BY {}", groups.join(", "))?;
        }
        Ok(())
    }
}
