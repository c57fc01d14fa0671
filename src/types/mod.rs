// Fundamental types
// Principle: Exact, minimal, platform independent

pub mod primitives;
pub mod rational;

pub use primitives::*;
pub use rational::*;
