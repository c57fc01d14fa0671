// KratOs Slashing Params - Governed slashing parameters and derived thresholds
// Principle: Exact arithmetic, stable keys, reads pinned to a logical height

pub mod consensus;
pub mod genesis;
pub mod params;
pub mod storage;
pub mod types;

#[cfg(test)]
mod tests;

pub use consensus::slashing::SlashingKeeper;
pub use genesis::{export_genesis, init_genesis, DefaultParameterSet, GenesisError, GenesisState};
pub use params::{ParamError, ParamName, ParamRegistry, ParamStore, ParamType, ParamValue, TypedParam};
pub use storage::{StateError, StateReader, StateWriter, VersionedStore};
pub use types::{ExactRational, RationalError, Seconds, ROUNDING_POLICY};
