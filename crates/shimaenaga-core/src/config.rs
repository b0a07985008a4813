//! Engine tuning: decay rates, action magnitudes, thresholds.
//!
//! All numeric constants live here so the app shell can ship a different
//! balance without touching the engine. Defaults: one hunger and one energy
//! point lost every five minutes, +20 hunger per meal.

use serde::{Deserialize, Serialize};

use crate::error::PetError;
use crate::pet::{LEVEL_MAX, LEVEL_MIN};

/// Tunable constants for a [`crate::PetEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Starting value for hunger, energy, and affection.
    pub initial_level: f64,
    /// Seconds of elapsed time per hunger point lost.
    pub hunger_seconds_per_point: f64,
    /// Seconds of elapsed time per energy point lost.
    pub energy_seconds_per_point: f64,
    /// Hunger gained per feed.
    pub feed_amount: f64,
    /// Affection gained per play.
    pub play_affection_gain: f64,
    /// Energy spent per play.
    pub play_energy_cost: f64,
    /// Play is refused when energy is below this.
    pub play_min_energy: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_level: 50.0,
            hunger_seconds_per_point: 300.0,
            energy_seconds_per_point: 300.0,
            feed_amount: 20.0,
            play_affection_gain: 15.0,
            play_energy_cost: 10.0,
            play_min_energy: 10.0,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config; absent fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PetError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| PetError::Decode(e.into()))?;
        let errors = validate(&config);
        if !errors.is_empty() {
            return Err(PetError::InvalidConfig(errors));
        }
        Ok(config)
    }
}

/// Config validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A decay period was zero, negative, or not finite.
    NonPositiveDecayPeriod { field: &'static str, value: f64 },
    /// An action magnitude was negative or not finite.
    InvalidMagnitude { field: &'static str, value: f64 },
    /// A level-valued setting was outside [0, 100].
    LevelOutOfRange { field: &'static str, value: f64 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositiveDecayPeriod { field, value } => {
                write!(f, "{} must be a positive number of seconds, got {}", field, value)
            }
            ConfigError::InvalidMagnitude { field, value } => {
                write!(f, "{} must be a non-negative amount, got {}", field, value)
            }
            ConfigError::LevelOutOfRange { field, value } => {
                write!(f, "{} must lie in [0, 100], got {}", field, value)
            }
        }
    }
}

/// Validate a config, returning all errors found.
pub fn validate(config: &EngineConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("hunger_seconds_per_point", config.hunger_seconds_per_point),
        ("energy_seconds_per_point", config.energy_seconds_per_point),
    ] {
        if !value.is_finite() || value <= 0.0 {
            errors.push(ConfigError::NonPositiveDecayPeriod { field, value });
        }
    }

    for (field, value) in [
        ("feed_amount", config.feed_amount),
        ("play_affection_gain", config.play_affection_gain),
        ("play_energy_cost", config.play_energy_cost),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(ConfigError::InvalidMagnitude { field, value });
        }
    }

    for (field, value) in [
        ("initial_level", config.initial_level),
        ("play_min_energy", config.play_min_energy),
    ] {
        if !(LEVEL_MIN..=LEVEL_MAX).contains(&value) {
            errors.push(ConfigError::LevelOutOfRange { field, value });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate(&EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_zero_decay_period_rejected() {
        let config = EngineConfig {
            hunger_seconds_per_point: 0.0,
            ..Default::default()
        };
        let errors = validate(&config);
        assert_eq!(
            errors,
            vec![ConfigError::NonPositiveDecayPeriod {
                field: "hunger_seconds_per_point",
                value: 0.0
            }]
        );
    }

    #[test]
    fn test_collects_every_error() {
        let config = EngineConfig {
            energy_seconds_per_point: f64::INFINITY,
            feed_amount: -1.0,
            play_min_energy: 101.0,
            ..Default::default()
        };
        assert_eq!(validate(&config).len(), 3);
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{"feed_amount": 25.0}"#).unwrap();
        assert_eq!(config.feed_amount, 25.0);
        assert_eq!(config.hunger_seconds_per_point, 300.0);
    }

    #[test]
    fn test_from_json_invalid_values() {
        let err = EngineConfig::from_json_str(r#"{"initial_level": -5}"#).unwrap_err();
        assert!(matches!(err, PetError::InvalidConfig(ref e) if e.len() == 1));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, PetError::Decode(_)));
    }
}
