pub mod compile_error;
pub use compile_error::*;

pub mod type_context;
pub use type_context::*;

pub mod typed_ast;
pub use typed_ast::*;

pub mod resolvers;
pub use resolvers::*;

pub mod compiler;
pub use compiler::*;
