pub mod alias_resolver;
pub use alias_resolver::*;

pub mod wildcard_resolver;
pub use wildcard_resolver::*;

pub mod aggregate_resolver;
pub use aggregate_resolver::*;

pub mod group_by_resolver;
pub use group_by_resolver::*;
