// Params - Registry, typed values and the store adapter for governed parameters
// Principle: Stable keys, explicit types, no silent coercion

pub mod registry;
pub mod store;
pub mod value;

pub use registry::*;
pub use store::*;
pub use value::*;
