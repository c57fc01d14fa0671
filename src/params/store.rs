// ParamStore - Typed get/set of parameters through a caller-supplied state handle
use super::registry::{ParamName, ParamRegistry, ParamType};
use super::value::{ParamValue, TypedParam};
use crate::storage::{StateError, StateReader, StateWriter};
use crate::types::{BlockNumber, RationalError};
use tracing::{info, warn};

/// Store adapter for one parameter space.
///
/// Holds only its registry. Every read goes to the state handle it is given,
/// so values can never leak from one height into another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamStore {
    registry: ParamRegistry,
}

impl ParamStore {
    pub const fn new(registry: ParamRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ParamRegistry {
        &self.registry
    }

    /// Typed read. `T` must be the registry's declared type for `name`, and the
    /// stored value must carry that same type.
    pub fn get<T, S>(&self, state: &S, name: ParamName) -> Result<T, ParamError>
    where
        T: TypedParam,
        S: StateReader + ?Sized,
    {
        self.check_declared(name, T::TYPE)?;
        let value = self.read_value(state, name)?;
        let found = value.param_type();

        T::from_value(value).ok_or_else(|| ParamError::TypeMismatch {
            name,
            expected: T::TYPE,
            found: found.to_string(),
        })
    }

    /// Untyped read, still checked against the declared type
    pub fn get_value<S>(&self, state: &S, name: ParamName) -> Result<ParamValue, ParamError>
    where
        S: StateReader + ?Sized,
    {
        let value = self.read_value(state, name)?;
        self.check_declared(name, value.param_type())?;
        Ok(value)
    }

    /// Whether `name` has a value at the handle's height
    pub fn has<S>(&self, state: &S, name: ParamName) -> Result<bool, ParamError>
    where
        S: StateReader + ?Sized,
    {
        let key = self.registry.key_for(name);
        Ok(state.get(key.as_bytes())?.is_some())
    }

    /// Typed write, effective from the handle's height onward
    pub fn set<T, S>(&self, state: &mut S, name: ParamName, value: T) -> Result<(), ParamError>
    where
        T: TypedParam,
        S: StateWriter + ?Sized,
    {
        self.check_declared(name, T::TYPE)?;
        self.write_value(state, name, &value.into_value())
    }

    /// Governance entry point: type check, range check, then write.
    pub fn set_parameter<S>(&self, state: &mut S, name: ParamName, value: ParamValue) -> Result<(), ParamError>
    where
        S: StateWriter + ?Sized,
    {
        if let Err(e) = value.validate_for(name) {
            warn!("Rejected update of {} to {} at height {}: {}", name, value, state.height(), e);
            return Err(e);
        }

        self.write_value(state, name, &value)?;
        info!("Parameter {} set to {} from height {}", name, value, state.height());
        Ok(())
    }

    fn check_declared(&self, name: ParamName, requested: ParamType) -> Result<(), ParamError> {
        let declared = self.registry.type_of(name);
        if declared != requested {
            return Err(ParamError::TypeMismatch {
                name,
                expected: declared,
                found: requested.to_string(),
            });
        }
        Ok(())
    }

    fn read_value<S>(&self, state: &S, name: ParamName) -> Result<ParamValue, ParamError>
    where
        S: StateReader + ?Sized,
    {
        let key = self.registry.key_for(name);
        let bytes = state
            .get(key.as_bytes())?
            .ok_or(ParamError::ParamNotFound {
                name,
                height: state.height(),
            })?;

        ParamValue::decode(name, self.registry.type_of(name), &bytes)
    }

    fn write_value<S>(&self, state: &mut S, name: ParamName, value: &ParamValue) -> Result<(), ParamError>
    where
        S: StateWriter + ?Sized,
    {
        let key = self.registry.key_for(name);
        state.set(key.as_bytes(), value.encode()?)?;
        Ok(())
    }
}

/// Parameter access errors. Every variant is surfaced to the caller as is;
/// nothing in this crate substitutes a default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("Parameter {name} not found at height {height}")]
    ParamNotFound { name: ParamName, height: BlockNumber },

    #[error("Type mismatch for {name}: expected {expected}, found {found}")]
    TypeMismatch {
        name: ParamName,
        expected: ParamType,
        found: String,
    },

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: ParamName, reason: String },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error(transparent)]
    Rational(#[from] RationalError),

    #[error(transparent)]
    State(#[from] StateError),
}
