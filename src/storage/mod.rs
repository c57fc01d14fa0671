// Storage - Replicated state access at a logical height
// Principle: The core reads and writes through a handle, it never owns state

pub mod state;
pub mod versioned;

pub use state::*;
pub use versioned::*;
