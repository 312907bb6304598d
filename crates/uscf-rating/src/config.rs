//! Rating system constants and their TOML loading.
//!
//! Every field defaults to the value in the published rating system, so an
//! empty or missing file yields the standard behavior.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The values parsed but are not usable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunable constants of the rating formulas.
///
/// # Example
///
/// ```
/// use uscf_rating::RatingConfig;
///
/// let config = RatingConfig::from_toml_str("special_rating_cap = 2800.0").unwrap();
/// assert_eq!(config.special_rating_cap, 2800.0);
/// assert_eq!(config.bonus_threshold, 14.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Residual below which the special rating objective counts as zero.
    pub epsilon: f64,
    /// Per-game threshold `B` of the standard rating bonus.
    pub bonus_threshold: f64,
    /// Upper limit of a special rating.
    pub special_rating_cap: f64,
    /// Base of the absolute rating floor.
    pub absolute_floor: f64,
    /// The absolute floor never rises above this.
    pub absolute_floor_cap: f64,
    /// Largest rating change from a single game or an individual match.
    pub single_game_max_change: f64,
    /// A single game against an opponent further away than this is unrated.
    pub unrated_gap: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-7,
            bonus_threshold: 14.0,
            special_rating_cap: 2700.0,
            absolute_floor: 100.0,
            absolute_floor_cap: 150.0,
            single_game_max_change: 50.0,
            unrated_gap: 400.0,
        }
    }
}

impl RatingConfig {
    /// Parses and validates a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RatingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] for invalid TOML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads the configuration if the file exists, otherwise returns defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Checks that every value is usable by the formulas.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("epsilon", self.epsilon),
            ("bonus_threshold", self.bonus_threshold),
            ("special_rating_cap", self.special_rating_cap),
            ("absolute_floor", self.absolute_floor),
            ("absolute_floor_cap", self.absolute_floor_cap),
            ("single_game_max_change", self.single_game_max_change),
            ("unrated_gap", self.unrated_gap),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
        }
        if self.epsilon <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.absolute_floor > self.absolute_floor_cap {
            return Err(ConfigError::Invalid(format!(
                "absolute_floor {} exceeds absolute_floor_cap {}",
                self.absolute_floor, self.absolute_floor_cap
            )));
        }
        if self.single_game_max_change < 0.0 || self.unrated_gap < 0.0 {
            return Err(ConfigError::Invalid(
                "single_game_max_change and unrated_gap must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_rating_system() {
        let config = RatingConfig::default();
        assert_eq!(config.epsilon, 1e-7);
        assert_eq!(config.bonus_threshold, 14.0);
        assert_eq!(config.special_rating_cap, 2700.0);
        assert_eq!(config.absolute_floor, 100.0);
        assert_eq!(config.absolute_floor_cap, 150.0);
        assert_eq!(config.single_game_max_change, 50.0);
        assert_eq!(config.unrated_gap, 400.0);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(RatingConfig::from_toml_str("").unwrap(), RatingConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = RatingConfig::from_toml_str("bonus_threshold = 12.0\nepsilon = 1e-9").unwrap();
        assert_eq!(config.bonus_threshold, 12.0);
        assert_eq!(config.epsilon, 1e-9);
        assert_eq!(config.unrated_gap, 400.0);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            RatingConfig::from_toml_str("epsilon = 0.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RatingConfig::from_toml_str("absolute_floor = 200.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RatingConfig::from_toml_str("unrated_gap = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RatingConfig::from_toml_str("epsilon = \"small\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "special_rating_cap = 2600.0").unwrap();

        let config = RatingConfig::load(file.path()).unwrap();
        assert_eq!(config.special_rating_cap, 2600.0);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rating.toml");

        assert!(matches!(
            RatingConfig::load(&path),
            Err(ConfigError::ReadError(_))
        ));
        assert_eq!(
            RatingConfig::load_or_default(&path).unwrap(),
            RatingConfig::default()
        );
    }
}
