// Parameter values - Tagged encoding and the typed accessor bridge
use super::registry::{ParamName, ParamType};
use super::store::ParamError;
use crate::types::{ExactRational, Seconds};
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parameter value as stored in state.
///
/// The variant tag travels with the payload, so a reader can tell a count
/// from a duration from a fraction without consulting anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    Seconds(Seconds),
    Count(i64),
    Rational(ExactRational),
}

impl ParamValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Seconds(_) => ParamType::Int64Seconds,
            ParamValue::Count(_) => ParamType::Int64Count,
            ParamValue::Rational(_) => ParamType::ExactRational,
        }
    }

    /// Same value with rationals in lowest terms
    pub fn canonical(&self) -> ParamValue {
        match self {
            ParamValue::Rational(r) => ParamValue::Rational(r.reduced()),
            other => other.clone(),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, ParamError> {
        codec()
            .serialize(self)
            .map_err(|e| ParamError::SerializationFailed(e.to_string()))
    }

    /// Decode stored bytes. Any failure is reported as a type mismatch
    /// against `expected`, since the bytes are not a value of that type.
    pub fn decode(name: ParamName, expected: ParamType, bytes: &[u8]) -> Result<Self, ParamError> {
        codec().deserialize(bytes).map_err(|e| ParamError::TypeMismatch {
            name,
            expected,
            found: format!("undecodable encoding ({})", e),
        })
    }

    /// Range rules applied to genesis values and governance writes
    pub fn validate_for(&self, name: ParamName) -> Result<(), ParamError> {
        let expected = name.param_type();
        if self.param_type() != expected {
            return Err(ParamError::TypeMismatch {
                name,
                expected,
                found: self.param_type().to_string(),
            });
        }

        let invalid = |reason: String| -> Result<(), ParamError> {
            Err(ParamError::InvalidValue { name, reason })
        };

        match self {
            ParamValue::Seconds(secs) if secs.0 < 0 => invalid(format!("negative duration {}", secs)),
            ParamValue::Count(count) if *count <= 0 => invalid(format!("window must be positive, got {}", count)),
            ParamValue::Rational(r) if !r.is_unit_interval() => {
                invalid(format!("fraction {} outside [0, 1]", r))
            }
            _ => Ok(()),
        }
    }
}

/// Fixed-width integers, and nothing may follow the value. Two nodes must
/// agree on whether the same stored bytes decode at all.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamValue::Seconds(secs) => write!(f, "{}", secs),
            ParamValue::Count(count) => write!(f, "{}", count),
            ParamValue::Rational(r) => write!(f, "{}", r),
        }
    }
}

/// Rust types that map onto exactly one [`ParamType`].
///
/// This is what lets `ParamStore::get::<T>` reject a read whose target type
/// disagrees with the registry before touching state.
pub trait TypedParam: Sized {
    const TYPE: ParamType;

    fn into_value(self) -> ParamValue;

    fn from_value(value: ParamValue) -> Option<Self>;
}

impl TypedParam for Seconds {
    const TYPE: ParamType = ParamType::Int64Seconds;

    fn into_value(self) -> ParamValue {
        ParamValue::Seconds(self)
    }

    fn from_value(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Seconds(secs) => Some(secs),
            _ => None,
        }
    }
}

impl TypedParam for i64 {
    const TYPE: ParamType = ParamType::Int64Count;

    fn into_value(self) -> ParamValue {
        ParamValue::Count(self)
    }

    fn from_value(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Count(count) => Some(count),
            _ => None,
        }
    }
}

impl TypedParam for ExactRational {
    const TYPE: ParamType = ParamType::ExactRational;

    fn into_value(self) -> ParamValue {
        ParamValue::Rational(self)
    }

    fn from_value(value: ParamValue) -> Option<Self> {
        match value {
            ParamValue::Rational(r) => Some(r),
            _ => None,
        }
    }
}
