// Parameter set configuration - genesis defaults and network overrides
use crate::params::{ParamError, ParamName, ParamValue};
use crate::types::{ExactRational, Hash, Seconds};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial values for all seven slashing parameters.
///
/// Used once at genesis. A network may ship its own set as a JSON file in
/// place of [`DefaultParameterSet::hub_default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultParameterSet {
    pub max_evidence_age: Seconds,
    pub signed_blocks_window: i64,
    pub min_signed_per_window: ExactRational,
    pub double_sign_unbond_duration: Seconds,
    pub downtime_unbond_duration: Seconds,
    pub slash_fraction_double_sign: ExactRational,
    pub slash_fraction_downtime: ExactRational,
}

impl DefaultParameterSet {
    /// Hub defaults.
    ///
    /// Evidence age and unbond durations are short testnet values; a
    /// production evidence age is 60 * 60 * 24 * 7 * 3 (three weeks).
    pub fn hub_default() -> Self {
        Self {
            max_evidence_age: Seconds::minutes(2),
            signed_blocks_window: 100,
            // Half of the window must be signed
            min_signed_per_window: ExactRational::percent(50),
            double_sign_unbond_duration: Seconds::minutes(5),
            downtime_unbond_duration: Seconds::minutes(10),
            slash_fraction_double_sign: ExactRational::percent(5),
            slash_fraction_downtime: ExactRational::percent(1),
        }
    }

    /// Values keyed by parameter, in registry order
    pub fn values(&self) -> Vec<(ParamName, ParamValue)> {
        vec![
            (ParamName::MaxEvidenceAge, ParamValue::Seconds(self.max_evidence_age)),
            (ParamName::SignedBlocksWindow, ParamValue::Count(self.signed_blocks_window)),
            (ParamName::MinSignedPerWindow, ParamValue::Rational(self.min_signed_per_window.clone())),
            (ParamName::DoubleSignUnbondDuration, ParamValue::Seconds(self.double_sign_unbond_duration)),
            (ParamName::DowntimeUnbondDuration, ParamValue::Seconds(self.downtime_unbond_duration)),
            (ParamName::SlashFractionDoubleSign, ParamValue::Rational(self.slash_fraction_double_sign.clone())),
            (ParamName::SlashFractionDowntime, ParamValue::Rational(self.slash_fraction_downtime.clone())),
        ]
    }

    /// Range-check every value; the first violation is returned
    pub fn validate(&self) -> Result<(), ParamError> {
        self.values()
            .iter()
            .try_for_each(|(name, value)| value.validate_for(*name))
    }

    /// Blake3 fingerprint of the set, independent of fraction representation.
    /// Nodes that agree on the digest agree on every derived threshold.
    pub fn digest(&self) -> Result<Hash, ConfigError> {
        let canonical: Vec<(&'static str, ParamValue)> = self
            .values()
            .into_iter()
            .map(|(name, value)| (name.as_str(), value.canonical()))
            .collect();
        let bytes = bincode::serialize(&canonical).map_err(|e| ConfigError::Encoding(e.to_string()))?;
        Ok(Hash::hash(&bytes))
    }

    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for DefaultParameterSet {
    fn default() -> Self {
        Self::hub_default()
    }
}

/// Parameter file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed parameter file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding failed: {0}")]
    Encoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn r(n: i64, d: i64) -> ExactRational {
        ExactRational::new(n, d).unwrap()
    }

    #[test]
    fn test_hub_default_values() {
        let set = DefaultParameterSet::hub_default();
        assert_eq!(set.max_evidence_age, Seconds(120));
        assert_eq!(set.signed_blocks_window, 100);
        assert_eq!(set.min_signed_per_window, r(1, 2));
        assert_eq!(set.double_sign_unbond_duration, Seconds(300));
        assert_eq!(set.downtime_unbond_duration, Seconds(600));
        assert_eq!(set.slash_fraction_double_sign, r(1, 20));
        assert_eq!(set.slash_fraction_downtime, r(1, 100));
        assert!(set.validate().is_ok());
        assert_eq!(DefaultParameterSet::default(), set);
    }

    #[test]
    fn test_values_follow_registry_order() {
        let names: Vec<ParamName> = DefaultParameterSet::hub_default()
            .values()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ParamName::ALL.to_vec());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut set = DefaultParameterSet::hub_default();
        set.slash_fraction_downtime = r(2, 1);
        assert!(matches!(
            set.validate(),
            Err(ParamError::InvalidValue { name: ParamName::SlashFractionDowntime, .. })
        ));

        let mut set = DefaultParameterSet::hub_default();
        set.signed_blocks_window = 0;
        assert!(set.validate().is_err());
    }

    #[test]
    fn test_digest_ignores_fraction_representation() {
        let set = DefaultParameterSet::hub_default();
        let mut scaled = set.clone();
        scaled.min_signed_per_window = r(50, 100);
        assert_eq!(set.digest().unwrap(), scaled.digest().unwrap());

        let mut changed = set.clone();
        changed.signed_blocks_window = 101;
        assert_ne!(set.digest().unwrap(), changed.digest().unwrap());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("slashing.json");

        let mut set = DefaultParameterSet::hub_default();
        set.max_evidence_age = Seconds(3 * 7 * Seconds::DAY.0);
        set.to_file(&path).unwrap();

        let loaded = DefaultParameterSet::from_file(&path).unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn test_json_override_form() {
        let json = r#"{
            "max_evidence_age": 1814400,
            "signed_blocks_window": 10000,
            "min_signed_per_window": "1/20",
            "double_sign_unbond_duration": 300,
            "downtime_unbond_duration": 600,
            "slash_fraction_double_sign": "1/20",
            "slash_fraction_downtime": "1/100"
        }"#;
        let set: DefaultParameterSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.signed_blocks_window, 10_000);
        assert_eq!(set.min_signed_per_window, r(1, 20));

        let bad = json.replace("\"1/100\"", "\"1/0\"");
        assert!(serde_json::from_str::<DefaultParameterSet>(&bad).is_err());

        let unknown = json.replace("\"signed_blocks_window\"", "\"window\"");
        assert!(serde_json::from_str::<DefaultParameterSet>(&unknown).is_err());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = DefaultParameterSet::from_file(temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
