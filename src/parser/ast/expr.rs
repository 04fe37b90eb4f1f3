use std::fmt;

use crate::parser::ast::{BinaryOp, Literal, UnaryOp};

/// Untyped expression tree as produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// Identifier as written, possibly qualified (`t.col`).
    Column(String),
    /// `*`, only valid as a whole select field or as `COUNT(*)`.
    Star,
    Unary { op: UnaryOp, expr: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Function(FunctionCall),
    InList { expr: Box<Expr>, list: Vec<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub distinct: bool,
}

impl Expr {
    pub fn unary(op: UnaryOp, expr: Expr) -> Self {
        Expr::Unary { op, expr: Box::new(expr) }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn column(name: &str) -> Self {
        Expr::Column(name.to_string())
    }

    pub fn int(i: i64) -> Self {
        Expr::Literal(Literal::Int(i))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Column(name) => write!(f, "{}", name),
            Expr::Star => write!(f, "*"),
            Expr::Unary { op: op @ (UnaryOp::IsNull | UnaryOp::IsNotNull), expr } => write!(f, "({} {})", expr, op),
            Expr::Unary { op: UnaryOp::Not, expr } => write!(f, "(NOT {})", expr),
            Expr::Unary { op, expr } => write!(f, "({}{})", op, expr),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Function(call) => {
                write!(f, "{}(", call.name.to_ascii_uppercase())?;
                if call.distinct {
                    write!(f, "DISTINCT ")?;
                }
                write_list(f, &call.args)?;
                write!(f, ")")
            }
            Expr::InList { expr, list } => {
                write!(f, "({} IN (", expr)?;
                write_list(f, list)?;
                write!(f, "))")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
