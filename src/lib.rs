pub mod parser;

pub mod runtime;
pub use runtime::{Clock, FixedClock, FunctionRegistry, SystemClock};

pub mod executor;
pub use executor::Context;

pub mod database;
pub use database::{Column, Config, DataType, QueryEngine, Schema, Table};

pub mod query_error;
pub use query_error::*;
