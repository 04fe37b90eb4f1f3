use std::fmt;

use crate::parser::ast::{Expr, Select};

/// FROM clause source.
#[derive(Debug, Clone, PartialEq)]
pub enum TableExpr {
    Table { name: String, alias: Option<String> },
    Subquery { select: Box<Select>, alias: Option<String> },
    Join { left: Box<TableExpr>, right: Box<TableExpr>, condition: Expr },
    /// Comma-separated sources, concatenated row-wise.
    Union(Vec<TableExpr>),
}

impl TableExpr {
    pub fn table(name: &str) -> Self {
        TableExpr::Table { name: name.to_string(), alias: None }
    }

    pub fn aliased(name: &str, alias: &str) -> Self {
        TableExpr::Table { name: name.to_string(), alias: Some(alias.to_string()) }
    }
}

impl fmt::Display for TableExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableExpr::Table { name, alias: None } => write!(f, "{}", name),
            TableExpr::Table { name, alias: Some(alias) } => write!(f, "{} AS {}", name, alias),
            TableExpr::Subquery { select, alias: None } => write!(f, "({})", select),
            TableExpr::Subquery { select, alias: Some(alias) } => write!(f, "({}) AS {}", select, alias),
            TableExpr::Join { left, right, condition } => write!(f, "{} JOIN {} ON {}", left, right, condition),
            TableExpr::Union(tables) => {
                for (i, t) in tables.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", t)?;
                }
                Ok(())
            }
        }
    }
}
