// Genesis - Initial parameter set and its one-time application
pub mod config;
pub mod spec;

pub use config::{ConfigError, DefaultParameterSet};
pub use spec::{export_genesis, init_genesis, GenesisError, GenesisState};
