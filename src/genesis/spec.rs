// Genesis - One-time initialization and export of the slashing parameters
use super::config::{ConfigError, DefaultParameterSet};
use crate::consensus::slashing::SlashingKeeper;
use crate::params::{ParamError, ParamName};
use crate::storage::{StateReader, StateWriter};
use crate::types::BlockNumber;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Genesis state of the slashing module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: DefaultParameterSet,
}

impl GenesisState {
    pub fn new(params: DefaultParameterSet) -> Self {
        Self { params }
    }
}

/// Write every parameter of `genesis` into `state`.
///
/// The whole set is validated before the first write, so a bad set leaves
/// state untouched. Fails if any parameter already has a value.
pub fn init_genesis<S: StateWriter + ?Sized>(
    keeper: &SlashingKeeper,
    state: &mut S,
    genesis: &GenesisState,
) -> Result<(), GenesisError> {
    let store = keeper.param_store();

    for name in ParamName::ALL {
        if store.has(&*state, name)? {
            return Err(GenesisError::AlreadyInitialized {
                name,
                height: state.height(),
            });
        }
    }

    genesis.params.validate()?;

    for (name, value) in genesis.params.values() {
        store.set_parameter(state, name, value)?;
    }

    info!(
        "Slashing parameters initialized at height {} (digest {})",
        state.height(),
        genesis.params.digest()?
    );
    Ok(())
}

/// Read the current parameters back out as a genesis state
pub fn export_genesis<S: StateReader + ?Sized>(
    keeper: &SlashingKeeper,
    state: &S,
) -> Result<GenesisState, GenesisError> {
    Ok(GenesisState::new(keeper.params(state)?))
}

/// Genesis errors
#[derive(Debug, thiserror::Error)]
pub enum GenesisError {
    #[error("Parameter {name} already initialized at height {height}")]
    AlreadyInitialized { name: ParamName, height: BlockNumber },

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
