pub mod operators;
pub use operators::*;

pub mod literal;
pub use literal::*;

pub mod expr;
pub use expr::*;

pub mod table_expr;
pub use table_expr::*;

pub mod select;
pub use select::*;
