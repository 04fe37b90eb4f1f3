pub mod context;
pub use context::*;

pub mod group_key;
pub use group_key::*;

pub mod evaluator;
pub use evaluator::*;

#[cfg(test)]
mod _tests;
