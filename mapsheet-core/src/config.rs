//! Mapping engine configuration.
//!
//! The defaults reproduce the standard greedy policy: accept a pairing at a
//! name score of 0.5, let a name score of 0.9 override incompatible types,
//! and weight confidence by type verdict.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::TypeCompatibility;

/// Confidence multiplier per type-compatibility verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeWeights {
    pub exact: f64,
    pub compatible: f64,
    /// Applied when the target may truncate the source
    pub lossy: f64,
    /// Applied to name-override pairings across incompatible types
    pub incompatible: f64,
}

impl Default for TypeWeights {
    fn default() -> Self {
        Self {
            exact: 1.0,
            compatible: 0.85,
            lossy: 0.7,
            incompatible: 0.3,
        }
    }
}

impl TypeWeights {
    /// Weight applied to a pairing with the given verdict.
    pub fn weight(&self, compatibility: TypeCompatibility) -> f64 {
        match compatibility {
            TypeCompatibility::Exact => self.exact,
            TypeCompatibility::Compatible => self.compatible,
            TypeCompatibility::Lossy => self.lossy,
            TypeCompatibility::Incompatible => self.incompatible,
        }
    }

    fn in_order(&self) -> [(&'static str, f64); 4] {
        [
            ("exact", self.exact),
            ("compatible", self.compatible),
            ("lossy", self.lossy),
            ("incompatible", self.incompatible),
        ]
    }
}

/// Engine thresholds and weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum name score for a pairing to be considered (0.0-1.0)
    pub min_name_score: f64,
    /// Name score at or above which incompatible types are still accepted
    pub name_override_score: f64,
    /// Confidence multipliers per verdict
    pub type_weights: TypeWeights,
}

/// Validation errors for engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("min_name_score must be between 0.0 and 1.0, got {0}")]
    InvalidMinNameScore(f64),
    #[error("name_override_score must be between 0.0 and 1.0, got {0}")]
    InvalidNameOverrideScore(f64),
    #[error("type weight '{name}' must be between 0.0 and 1.0, got {value}")]
    InvalidTypeWeight { name: &'static str, value: f64 },
    #[error("type weight '{higher}' must not be lower than '{lower}'")]
    UnorderedTypeWeights {
        higher: &'static str,
        lower: &'static str,
    },
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_name_score: 0.5,
            name_override_score: 0.9,
            type_weights: TypeWeights::default(),
        }
    }
}

fn clamp_unit(name: &str, value: f64) -> f64 {
    if !(0.0..=1.0).contains(&value) {
        tracing::warn!("{} {} clamped to valid range [0.0, 1.0]", name, value);
    }
    value.clamp(0.0, 1.0)
}

impl EngineConfig {
    /// Creates a new engine config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the acceptance threshold.
    pub fn with_min_name_score(mut self, threshold: f64) -> Self {
        self.min_name_score = clamp_unit("min_name_score", threshold);
        self
    }

    /// Builder method to set the name score that overrides a type mismatch.
    pub fn with_name_override_score(mut self, threshold: f64) -> Self {
        self.name_override_score = clamp_unit("name_override_score", threshold);
        self
    }

    /// Builder method to set confidence weights. Each weight is clamped;
    /// ordering is checked by [`EngineConfig::validate`].
    pub fn with_type_weights(mut self, weights: TypeWeights) -> Self {
        self.type_weights = TypeWeights {
            exact: clamp_unit("type_weights.exact", weights.exact),
            compatible: clamp_unit("type_weights.compatible", weights.compatible),
            lossy: clamp_unit("type_weights.lossy", weights.lossy),
            incompatible: clamp_unit("type_weights.incompatible", weights.incompatible),
        };
        self
    }

    /// Validates the configuration.
    ///
    /// Scores and weights must lie in [0.0, 1.0] and weights must not
    /// increase from `exact` down to `incompatible`.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.min_name_score) {
            return Err(ConfigValidationError::InvalidMinNameScore(
                self.min_name_score,
            ));
        }
        if !(0.0..=1.0).contains(&self.name_override_score) {
            return Err(ConfigValidationError::InvalidNameOverrideScore(
                self.name_override_score,
            ));
        }

        let weights = self.type_weights.in_order();
        for (name, value) in weights {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidTypeWeight { name, value });
            }
        }
        for pair in weights.windows(2) {
            let [(higher, high), (lower, low)] = [pair[0], pair[1]];
            if high < low {
                return Err(ConfigValidationError::UnorderedTypeWeights { higher, lower });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.min_name_score, 0.5);
        assert_eq!(config.name_override_score, 0.9);
        assert_eq!(config.type_weights.weight(TypeCompatibility::Exact), 1.0);
        assert_eq!(config.type_weights.weight(TypeCompatibility::Compatible), 0.85);
        assert_eq!(config.type_weights.weight(TypeCompatibility::Lossy), 0.7);
        assert_eq!(config.type_weights.weight(TypeCompatibility::Incompatible), 0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_clamps_out_of_range_values() {
        let config = EngineConfig::new()
            .with_min_name_score(1.5)
            .with_name_override_score(-0.2);
        assert_eq!(config.min_name_score, 1.0);
        assert_eq!(config.name_override_score, 0.0);

        let config = EngineConfig::new().with_type_weights(TypeWeights {
            exact: 2.0,
            ..TypeWeights::default()
        });
        assert_eq!(config.type_weights.exact, 1.0);
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let config = EngineConfig {
            min_name_score: 1.2,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidMinNameScore(1.2))
        );

        let config = EngineConfig {
            type_weights: TypeWeights {
                incompatible: -0.1,
                ..TypeWeights::default()
            },
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTypeWeight {
                name: "incompatible",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_unordered_weights() {
        let config = EngineConfig::new().with_type_weights(TypeWeights {
            exact: 1.0,
            compatible: 0.6,
            lossy: 0.8,
            incompatible: 0.3,
        });
        let error = config.validate().unwrap_err();
        assert_eq!(
            error,
            ConfigValidationError::UnorderedTypeWeights {
                higher: "compatible",
                lower: "lossy",
            }
        );
        assert!(error.to_string().contains("'compatible'"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"min_name_score": 0.6, "type_weights": {"lossy": 0.5}}"#)
                .unwrap();
        assert_eq!(config.min_name_score, 0.6);
        assert_eq!(config.name_override_score, 0.9);
        assert_eq!(config.type_weights.lossy, 0.5);
        assert_eq!(config.type_weights.compatible, 0.85);
    }
}
