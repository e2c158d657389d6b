//! Tunables for the bug hunter overlay. Defaults reproduce the shipped behaviour;
//! the host page may override any subset through `start_bug_hunter_with_config`.

use thiserror::Error;

/// Local-storage key holding the decimal cumulative squash count.
pub const DEFAULT_STORAGE_KEY: &str = "bugHunter.totalBugsSquashed";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Config {
    pub storage_key: String,
    pub min_travel_ms: f64,
    pub max_travel_ms: f64,
    /// Distance outside the viewport where bugs enter and leave.
    pub edge_offset_px: f64,
    pub squash_ms: f64,
    /// Delay between a bug's removal and the next spawn.
    pub respawn_delay_ms: f64,
    pub celebration_ms: f64,
    pub score_pulse_ms: f64,
    pub floating_one_ms: f64,
    pub tap_haptic_ms: u32,
    pub rank_up_haptic_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            min_travel_ms: 10_000.0,
            max_travel_ms: 15_000.0,
            edge_offset_px: 50.0,
            squash_ms: 300.0,
            respawn_delay_ms: 500.0,
            celebration_ms: 5_000.0,
            score_pulse_ms: 400.0,
            floating_one_ms: 1_000.0,
            tap_haptic_ms: 30,
            rank_up_haptic_ms: 60,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("storage key must not be empty")]
    EmptyStorageKey,
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidDuration { field: &'static str, value: f64 },
    #[error("travel range is inverted: min {min} ms > max {max} ms")]
    InvertedTravelRange { min: f64, max: f64 },
    #[error("travel duration must be positive")]
    ZeroTravel,
    #[cfg(feature = "serde_json")]
    #[error("malformed config JSON: {0}")]
    Json(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        let durations = [
            ("min_travel_ms", self.min_travel_ms),
            ("max_travel_ms", self.max_travel_ms),
            ("edge_offset_px", self.edge_offset_px),
            ("squash_ms", self.squash_ms),
            ("respawn_delay_ms", self.respawn_delay_ms),
            ("celebration_ms", self.celebration_ms),
            ("score_pulse_ms", self.score_pulse_ms),
            ("floating_one_ms", self.floating_one_ms),
        ];
        for (field, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration { field, value });
            }
        }
        if self.min_travel_ms > self.max_travel_ms {
            return Err(ConfigError::InvertedTravelRange { min: self.min_travel_ms, max: self.max_travel_ms });
        }
        if self.max_travel_ms == 0.0 {
            return Err(ConfigError::ZeroTravel);
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON object; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.storage_key, "bugHunter.totalBugsSquashed");
        assert_eq!(cfg.squash_ms, 300.0);
        assert_eq!(cfg.celebration_ms, 5_000.0);
    }

    #[test]
    fn rejects_inverted_travel_range() {
        let cfg = Config { min_travel_ms: 20_000.0, ..Config::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvertedTravelRange { .. })));
    }

    #[test]
    fn rejects_negative_and_nan_durations() {
        let cfg = Config { squash_ms: -1.0, ..Config::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidDuration { field: "squash_ms", value: -1.0 }));
        let cfg = Config { celebration_ms: f64::NAN, ..Config::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidDuration { field: "celebration_ms", .. })));
    }

    #[test]
    fn rejects_empty_key_and_zero_travel() {
        let cfg = Config { storage_key: String::new(), ..Config::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyStorageKey));
        let cfg = Config { min_travel_ms: 0.0, max_travel_ms: 0.0, ..Config::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTravel));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{ "respawn_delay_ms": 0, "storage_key": "demo.total" }"#).unwrap();
        assert_eq!(cfg.respawn_delay_ms, 0.0);
        assert_eq!(cfg.storage_key, "demo.total");
        assert_eq!(cfg.max_travel_ms, 15_000.0);
        assert!(matches!(Config::from_json("{ nope"), Err(ConfigError::Json(_))));
    }
}
