// Consensus - Policy values derived from governed parameters
pub mod slashing;

pub use slashing::SlashingKeeper;
