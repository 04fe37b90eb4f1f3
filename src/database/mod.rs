pub mod data_type;
pub use data_type::*;

pub mod table_error;
pub use table_error::*;

pub mod table;
pub use table::*;

pub mod schema_provider;
pub use schema_provider::*;

pub mod config;
pub use config::*;

pub mod query_engine;
pub use query_engine::*;
