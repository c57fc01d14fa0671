// Slashing - Derived policy values consumed by evidence and downtime handling
// Principle: Same stored inputs, same integer, on every node

use crate::genesis::DefaultParameterSet;
use crate::params::{ParamError, ParamName, ParamRegistry, ParamStore, ParamValue};
use crate::storage::{StateReader, StateWriter};
use crate::types::{ExactRational, Seconds};
use std::time::Duration;
use tracing::debug;

/// Read side of the slashing parameters plus the governance write entry.
///
/// Stateless: each accessor is a pure function of the parameters visible
/// through the handle it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlashingKeeper {
    store: ParamStore,
}

impl SlashingKeeper {
    pub fn new() -> Self {
        Self::with_store(ParamStore::new(ParamRegistry::slashing()))
    }

    pub fn with_store(store: ParamStore) -> Self {
        Self { store }
    }

    pub fn param_store(&self) -> &ParamStore {
        &self.store
    }

    /// Max age for evidence - 21 days (3 weeks) on a production network
    pub fn max_evidence_age<S: StateReader + ?Sized>(&self, state: &S) -> Result<Duration, ParamError> {
        self.duration(state, ParamName::MaxEvidenceAge)
    }

    /// Sliding window for downtime slashing
    pub fn signed_blocks_window<S: StateReader + ?Sized>(&self, state: &S) -> Result<i64, ParamError> {
        self.store.get(state, ParamName::SignedBlocksWindow)
    }

    /// Raw liveness fraction, as stored
    pub fn min_signed_per_window<S: StateReader + ?Sized>(&self, state: &S) -> Result<ExactRational, ParamError> {
        self.store.get(state, ParamName::MinSignedPerWindow)
    }

    /// Blocks a validator must sign within the window to avoid a downtime slash.
    ///
    /// `round(window * MinSignedPerWindow)` in exact arithmetic, ties away from
    /// zero. 100 blocks at 1/2 gives 50; at 1/3 gives 33.
    pub fn min_signed_threshold<S: StateReader + ?Sized>(&self, state: &S) -> Result<i64, ParamError> {
        let window = self.signed_blocks_window(state)?;
        let fraction = self.min_signed_per_window(state)?;
        let threshold = (&ExactRational::from_int(window) * &fraction).round_to_i64()?;

        debug!(
            "Min signed threshold at height {}: {} of {} blocks ({})",
            state.height(),
            threshold,
            window,
            fraction
        );
        Ok(threshold)
    }

    pub fn double_sign_unbond_duration<S: StateReader + ?Sized>(&self, state: &S) -> Result<Duration, ParamError> {
        self.duration(state, ParamName::DoubleSignUnbondDuration)
    }

    pub fn downtime_unbond_duration<S: StateReader + ?Sized>(&self, state: &S) -> Result<Duration, ParamError> {
        self.duration(state, ParamName::DowntimeUnbondDuration)
    }

    /// Stake fraction forfeited for double signing - 5% by default
    pub fn slash_fraction_double_sign<S: StateReader + ?Sized>(&self, state: &S) -> Result<ExactRational, ParamError> {
        self.store.get(state, ParamName::SlashFractionDoubleSign)
    }

    /// Stake fraction forfeited for downtime - 1% by default
    pub fn slash_fraction_downtime<S: StateReader + ?Sized>(&self, state: &S) -> Result<ExactRational, ParamError> {
        self.store.get(state, ParamName::SlashFractionDowntime)
    }

    /// All seven raw values in one bundle
    pub fn params<S: StateReader + ?Sized>(&self, state: &S) -> Result<DefaultParameterSet, ParamError> {
        Ok(DefaultParameterSet {
            max_evidence_age: self.store.get(state, ParamName::MaxEvidenceAge)?,
            signed_blocks_window: self.signed_blocks_window(state)?,
            min_signed_per_window: self.min_signed_per_window(state)?,
            double_sign_unbond_duration: self.store.get(state, ParamName::DoubleSignUnbondDuration)?,
            downtime_unbond_duration: self.store.get(state, ParamName::DowntimeUnbondDuration)?,
            slash_fraction_double_sign: self.slash_fraction_double_sign(state)?,
            slash_fraction_downtime: self.slash_fraction_downtime(state)?,
        })
    }

    /// Governance-driven update. Authorization happens before this call.
    pub fn set_parameter<S: StateWriter + ?Sized>(
        &self,
        state: &mut S,
        name: ParamName,
        value: ParamValue,
    ) -> Result<(), ParamError> {
        self.store.set_parameter(state, name, value)
    }

    fn duration<S: StateReader + ?Sized>(&self, state: &S, name: ParamName) -> Result<Duration, ParamError> {
        let secs: Seconds = self.store.get(state, name)?;
        secs.to_duration().ok_or_else(|| ParamError::InvalidValue {
            name,
            reason: format!("negative duration {}", secs),
        })
    }
}
