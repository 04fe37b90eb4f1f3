pub mod runtime_error;
pub use runtime_error::*;

pub mod truth;
pub use truth::*;

pub mod values;
pub use values::*;

pub mod key_value;
pub use key_value::*;

pub mod clock;
pub use clock::*;

pub mod accumulator;
pub use accumulator::*;

pub mod function;
pub use function::*;

pub mod function_registry;
pub use function_registry::*;

pub mod functions;
pub use functions::*;
