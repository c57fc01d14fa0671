// Registry - The seven slashing parameters, their keys and declared types
use super::store::ParamError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parameter space for the slashing module
pub const SLASHING_PARAM_SPACE: &str = "Slashing";

/// Logical parameter names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParamName {
    /// Oldest evidence still accepted, in seconds
    MaxEvidenceAge,
    /// Rolling window of blocks over which liveness is tracked
    SignedBlocksWindow,
    /// Fraction of the window a validator must sign
    MinSignedPerWindow,
    /// Lock period after a double-sign slash, in seconds
    DoubleSignUnbondDuration,
    /// Lock period after a downtime slash, in seconds
    DowntimeUnbondDuration,
    /// Stake fraction forfeited for double signing
    SlashFractionDoubleSign,
    /// Stake fraction forfeited for downtime
    SlashFractionDowntime,
}

impl ParamName {
    /// Every parameter, in declaration order
    pub const ALL: [ParamName; 7] = [
        ParamName::MaxEvidenceAge,
        ParamName::SignedBlocksWindow,
        ParamName::MinSignedPerWindow,
        ParamName::DoubleSignUnbondDuration,
        ParamName::DowntimeUnbondDuration,
        ParamName::SlashFractionDoubleSign,
        ParamName::SlashFractionDowntime,
    ];

    /// Canonical name; also the final segment of the storage key
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamName::MaxEvidenceAge => "MaxEvidenceAge",
            ParamName::SignedBlocksWindow => "SignedBlocksWindow",
            ParamName::MinSignedPerWindow => "MinSignedPerWindow",
            ParamName::DoubleSignUnbondDuration => "DoubleSignUnbondDuration",
            ParamName::DowntimeUnbondDuration => "DowntimeUnbondDuration",
            ParamName::SlashFractionDoubleSign => "SlashFractionDoubleSign",
            ParamName::SlashFractionDowntime => "SlashFractionDowntime",
        }
    }

    /// Declared type. Fixed for the lifetime of the chain.
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamName::MaxEvidenceAge
            | ParamName::DoubleSignUnbondDuration
            | ParamName::DowntimeUnbondDuration => ParamType::Int64Seconds,
            ParamName::SignedBlocksWindow => ParamType::Int64Count,
            ParamName::MinSignedPerWindow
            | ParamName::SlashFractionDoubleSign
            | ParamName::SlashFractionDowntime => ParamType::ExactRational,
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ParamError::UnknownParameter(s.to_string()))
    }
}

/// Value types a parameter slot can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    Int64Seconds,
    Int64Count,
    ExactRational,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ParamType::Int64Seconds => "Int64Seconds",
            ParamType::Int64Count => "Int64Count",
            ParamType::ExactRational => "ExactRational",
        };
        f.write_str(name)
    }
}

/// Storage path of a parameter: `<space>/<name>` as UTF-8 bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamKey(Vec<u8>);

impl ParamKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Maps parameter names to keys and types.
///
/// Holds nothing but its namespace: keys are recomputed from the name on
/// every call, so they are identical on every node and across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamRegistry {
    space: &'static str,
}

impl ParamRegistry {
    pub const fn new(space: &'static str) -> Self {
        Self { space }
    }

    pub const fn slashing() -> Self {
        Self::new(SLASHING_PARAM_SPACE)
    }

    pub fn key_for(&self, name: ParamName) -> ParamKey {
        ParamKey(format!("{}/{}", self.space, name.as_str()).into_bytes())
    }

    pub fn type_of(&self, name: ParamName) -> ParamType {
        name.param_type()
    }
}

impl Default for ParamRegistry {
    fn default() -> Self {
        Self::slashing()
    }
}
