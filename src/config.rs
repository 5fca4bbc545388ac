use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "HealthRevo";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable names read by [`EngineConfig::from_env`].
pub const ENV_ANOMALY_THRESHOLD: &str = "HEALTHREVO_ANOMALY_THRESHOLD_PERCENTAGE";
pub const ENV_MIN_HISTORY: &str = "HEALTHREVO_MIN_HISTORY_READINGS";
pub const ENV_RISK_WINDOW_DAYS: &str = "HEALTHREVO_RISK_WINDOW_DAYS";
pub const ENV_RISK_METHOD: &str = "HEALTHREVO_RISK_METHOD";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "healthrevo_core=info,healthrevo=info,warn"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Config file {0} could not be read: {1}")]
    Read(String, String),

    #[error("Config file {0} could not be parsed: {1}")]
    Parse(String, String),
}

/// Settings shared by every engine. Passed by value at construction;
/// engines never consult ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Relative deviation from the historical mean (in percent) above which
    /// a reading is reported as a statistical anomaly.
    pub anomaly_threshold_percentage: f64,
    /// Minimum non-null historical values a field needs before the
    /// statistical pass looks at it.
    pub min_history_readings: usize,
    /// Days of history fed to the risk calculators.
    pub risk_calculation_window_days: i64,
    /// Method tag stamped on every risk record.
    pub risk_method: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            anomaly_threshold_percentage: 20.0,
            min_history_readings: 3,
            risk_calculation_window_days: 7,
            risk_method: "heuristic-v1".into(),
        }
    }
}

impl EngineConfig {
    /// Anomaly threshold as a fraction (20% -> 0.2).
    pub fn anomaly_threshold_fraction(&self) -> f64 {
        self.anomaly_threshold_percentage / 100.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.anomaly_threshold_percentage;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(invalid(
                "anomaly_threshold_percentage",
                threshold,
                "must be a positive number",
            ));
        }
        if self.min_history_readings == 0 {
            return Err(invalid(
                "min_history_readings",
                self.min_history_readings,
                "must be at least 1",
            ));
        }
        if self.risk_calculation_window_days < 1 {
            return Err(invalid(
                "risk_calculation_window_days",
                self.risk_calculation_window_days,
                "must be at least 1",
            ));
        }
        if self.risk_method.trim().is_empty() {
            return Err(invalid("risk_method", "", "must not be empty"));
        }
        Ok(())
    }

    /// Load from a JSON file. Missing keys fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build from a key lookup, starting from defaults.
    /// Unset keys keep their default; set-but-unparsable keys are fatal.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ANOMALY_THRESHOLD) {
            config.anomaly_threshold_percentage = parse_key(ENV_ANOMALY_THRESHOLD, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MIN_HISTORY) {
            config.min_history_readings = parse_key(ENV_MIN_HISTORY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RISK_WINDOW_DAYS) {
            config.risk_calculation_window_days = parse_key(ENV_RISK_WINDOW_DAYS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RISK_METHOD) {
            config.risk_method = raw.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

fn parse_key<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn invalid(key: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.anomaly_threshold_percentage, 20.0);
        assert_eq!(config.min_history_readings, 3);
        assert_eq!(config.risk_method, "heuristic-v1");
        assert!((config.anomaly_threshold_fraction() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn lookup_overrides_threshold() {
        let config =
            EngineConfig::from_lookup(lookup_from(&[(ENV_ANOMALY_THRESHOLD, "35")])).unwrap();
        assert_eq!(config.anomaly_threshold_percentage, 35.0);
        assert_eq!(config.risk_calculation_window_days, 7);
    }

    #[test]
    fn non_numeric_threshold_is_fatal() {
        let result = EngineConfig::from_lookup(lookup_from(&[(ENV_ANOMALY_THRESHOLD, "twenty")]));
        match result {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, ENV_ANOMALY_THRESHOLD),
            other => panic!("Expected InvalidValue, got: {:?}", other),
        }
    }

    #[test]
    fn zero_threshold_rejected() {
        let result = EngineConfig::from_lookup(lookup_from(&[(ENV_ANOMALY_THRESHOLD, "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn zero_window_rejected() {
        let result = EngineConfig::from_lookup(lookup_from(&[(ENV_RISK_WINDOW_DAYS, "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn json_file_partial_keys_use_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"anomaly_threshold_percentage": 15.5}}"#).unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.anomaly_threshold_percentage, 15.5);
        assert_eq!(config.min_history_readings, 3);
    }

    #[test]
    fn json_file_with_string_threshold_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"anomaly_threshold_percentage": "high"}}"#).unwrap();

        match EngineConfig::from_json_file(file.path()) {
            Err(ConfigError::Parse(_, _)) => {}
            other => panic!("Expected Parse error, got: {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = EngineConfig::from_json_file(Path::new("/nonexistent/healthrevo.json"));
        assert!(matches!(result, Err(ConfigError::Read(_, _))));
    }

    #[test]
    fn app_name_is_healthrevo() {
        assert_eq!(APP_NAME, "HealthRevo");
    }
}
