use crate::{parser::ast::Expr, runtime::FunctionRegistry};

pub struct AggregateResolver;

impl AggregateResolver {
    /// Whether the untyped expression calls an aggregate anywhere.
    pub fn contains_aggregate(expr: &Expr, registry: &FunctionRegistry) -> bool {
        match expr {
            Expr::Literal(_) | Expr::Column(_) | Expr::Star => false,
            Expr::Unary { expr, .. } => Self::contains_aggregate(expr, registry),
            Expr::Binary { left, right, .. } => {
                Self::contains_aggregate(left, registry) || Self::contains_aggregate(right, registry)
            }
            Expr::Function(f) => {
                registry.is_aggregate(&f.name) || f.args.iter().any(|a| Self::contains_aggregate(a, registry))
            }
            Expr::InList { expr, list } => {
                Self::contains_aggregate(expr, registry) || list.iter().any(|e| Self::contains_aggregate(e, registry))
            }
        }
    }

    /// Whether any argument of a call contains an aggregate.
    pub fn args_contain_aggregate(args: &[Expr], registry: &FunctionRegistry) -> bool {
        args.iter().any(|a| Self::contains_aggregate(a, registry))
    }
}
