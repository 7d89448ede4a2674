//! TOML-based application configuration.
//!
//! Stores forecasting preferences including:
//! - The calendar used for hour/day buckets
//! - Blend weights for pattern analysis
//! - Forecast horizon, noise and seed
//! - Dip thresholds
//! - An optional custom baseline table
//!
//! Configuration is stored at `~/.config/moodcast/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::baseline::BaselineTable;
use crate::error::ConfigError;
use crate::forecast::{DipConfig, DipFinder, ForecastConfig, Forecaster};
use crate::pattern::{AnalysisConfig, PatternAnalyzer};
use crate::time_basis::TimeBasis;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/moodcast/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Calendar for hour-of-day and day-of-week buckets.
    #[serde(default)]
    pub time_basis: TimeBasis,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub dips: DipConfig,
    /// Custom baseline curves; the built-in table is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselineTable>,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".to_string(),
        };
        let unparsable = |expected: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse '{value}' as {expected}"),
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => {
                        serde_json::Value::Bool(value.parse::<bool>().map_err(|_| unparsable("bool"))?)
                    }
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| unparsable("number"))?
                        } else {
                            return Err(unparsable("number"));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|_| unparsable("JSON"))?
                    }
                    // unset optionals (e.g. forecast.seed) take any JSON scalar
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/moodcast"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// validated, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config is invalid. The config is unchanged on error.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and persist. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Check value ranges across all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| -> Result<(), ConfigError> {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };

        if let TimeBasis::FixedOffset { minutes } = self.time_basis {
            if minutes.unsigned_abs() >= 24 * 60 {
                return invalid("time_basis", "fixed offset must be within ±24h");
            }
        }

        let a = &self.analysis;
        if a.hourly_weight_divisor.is_nan() || a.hourly_weight_divisor <= 0.0 {
            return invalid("analysis.hourly_weight_divisor", "must be positive");
        }
        if a.weekly_weight_divisor.is_nan() || a.weekly_weight_divisor <= 0.0 {
            return invalid("analysis.weekly_weight_divisor", "must be positive");
        }
        if !(0.0..=1.0).contains(&a.hourly_weight_cap) {
            return invalid("analysis.hourly_weight_cap", "must be within 0.0-1.0");
        }
        if !(0.0..=1.0).contains(&a.weekly_weight_cap) {
            return invalid("analysis.weekly_weight_cap", "must be within 0.0-1.0");
        }

        let f = &self.forecast;
        if f.default_horizon_hours == 0 {
            return invalid("forecast.default_horizon_hours", "must be at least 1");
        }
        if f.trend_span == 0 {
            return invalid("forecast.trend_span", "must be at least 1");
        }
        if f.trend_window < f.trend_span {
            return invalid("forecast.trend_window", "must be at least trend_span");
        }
        if !f.mood_noise_amplitude.is_finite() || f.mood_noise_amplitude < 0.0 {
            return invalid("forecast.mood_noise_amplitude", "must be a non-negative number");
        }
        if !f.energy_noise_amplitude.is_finite() || f.energy_noise_amplitude < 0.0 {
            return invalid("forecast.energy_noise_amplitude", "must be a non-negative number");
        }

        if !(0.0..=1.0).contains(&self.dips.confidence_cutoff) {
            return invalid("dips.confidence_cutoff", "must be within 0.0-1.0");
        }

        if let Some(baseline) = &self.baseline {
            baseline.validate().map_err(|e| ConfigError::InvalidValue {
                key: "baseline".to_string(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Baseline table in effect.
    pub fn baseline_table(&self) -> BaselineTable {
        self.baseline.clone().unwrap_or_default()
    }

    /// Analyzer built from this config.
    pub fn analyzer(&self) -> PatternAnalyzer {
        PatternAnalyzer::with_config(self.analysis.clone(), self.baseline_table())
            .with_time_basis(self.time_basis)
    }

    /// Forecaster built from this config.
    pub fn forecaster(&self) -> Forecaster {
        Forecaster::with_config(self.forecast.clone(), self.baseline_table())
            .with_time_basis(self.time_basis)
    }

    /// Dip finder built from this config.
    pub fn dip_finder(&self) -> DipFinder {
        DipFinder::with_config(self.dips.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.forecast.default_horizon_hours, 12);
        assert_eq!(parsed.time_basis, TimeBasis::Local);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [time_basis]
            kind = "utc"

            [forecast]
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(cfg.time_basis, TimeBasis::Utc);
        assert_eq!(cfg.forecast.seed, Some(7));
        assert_eq!(cfg.forecast.trend_window, 10);
        assert_eq!(cfg.analysis.hourly_weight_cap, 0.8);
        assert_eq!(cfg.dips.confident_threshold, 30);
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("forecast.default_horizon_hours").as_deref(), Some("12"));
        assert_eq!(cfg.get("time_basis.kind").as_deref(), Some("local"));
        assert_eq!(cfg.get("forecast.seed").as_deref(), Some("null"));
        assert!(cfg.get("nope").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_value_by_dotted_key() {
        let mut cfg = Config::default();
        cfg.set_value("forecast.default_horizon_hours", "24").unwrap();
        cfg.set_value("forecast.seed", "42").unwrap();
        cfg.set_value("analysis.hourly_weight_cap", "0.9").unwrap();
        cfg.set_value("time_basis.kind", "utc").unwrap();

        assert_eq!(cfg.forecast.default_horizon_hours, 24);
        assert_eq!(cfg.forecast.seed, Some(42));
        assert_eq!(cfg.analysis.hourly_weight_cap, 0.9);
        assert_eq!(cfg.time_basis, TimeBasis::Utc);
    }

    #[test]
    fn set_value_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("forecast.nope", "1").is_err());
        assert!(cfg.set_value("forecast.default_horizon_hours", "soon").is_err());
        assert!(cfg.set_value("forecast.default_horizon_hours", "0").is_err());
        assert!(cfg.set_value("dips.confidence_cutoff", "1.5").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn validate_rejects_bad_ranges() {
        let mut cfg = Config::default();
        cfg.forecast.trend_window = 2;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "forecast.trend_window"
        ));

        let mut cfg = Config::default();
        cfg.analysis.weekly_weight_divisor = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.forecast.energy_noise_amplitude = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.analysis.hourly_weight_divisor = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn set_value_rejects_out_of_range_fixed_offset() {
        let mut cfg = Config::default();
        let err = cfg
            .set_value("time_basis", r#"{"kind":"fixed_offset","minutes":99999}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "time_basis"));
        assert_eq!(cfg, Config::default());

        cfg.set_value("time_basis", r#"{"kind":"fixed_offset","minutes":-600}"#)
            .unwrap();
        assert_eq!(cfg.time_basis, TimeBasis::FixedOffset { minutes: -600 });
        assert!(cfg.analyzer().analyze(&[crate::Sample::new(0, 50, 50)]).is_ok());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.time_basis = TimeBasis::FixedOffset { minutes: 540 };
        cfg.forecast.seed = Some(9);
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[forecast\nseed = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load_from(&missing),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn components_follow_config() {
        let mut cfg = Config::default();
        cfg.time_basis = TimeBasis::Utc;
        cfg.dips.confident_threshold = 20;

        assert_eq!(cfg.analyzer().time_basis(), TimeBasis::Utc);
        assert_eq!(cfg.forecaster().time_basis(), TimeBasis::Utc);
        assert_eq!(cfg.dip_finder().threshold_for(0.9), 20);
        assert!(cfg.baseline_table().is_complete());
    }
}
