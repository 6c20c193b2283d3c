use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Result, WarmRestartError};

/// How a scheduler reacts when the epoch moves past the end of the current period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Restart only when `epoch - restart_origin` lands exactly on the period.
    /// Epoch sequences that jump over the boundary never restart.
    #[default]
    Exact,
    /// Apply every restart whose boundary has been reached or passed, so a
    /// resumed run lands in the same cycle a contiguous run would have.
    CatchUp,
}

/// Configuration for a warm-restart learning rate schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmRestartConfig {
    /// Lower bound of the oscillation
    pub min_lr: f64,

    /// Upper bound of the oscillation, the rate right after every restart
    pub max_lr: f64,

    /// Length of the first period in epochs
    pub period: f64,

    /// Growth multiplier applied to the period after each restart
    pub factor: f64,

    pub restart_policy: RestartPolicy,
}

impl Default for WarmRestartConfig {
    fn default() -> Self {
        Self {
            min_lr: 0.0,
            max_lr: 0.1,
            period: 5.0,
            factor: 2.0,
            restart_policy: RestartPolicy::Exact,
        }
    }
}

impl WarmRestartConfig {
    /// Validate configuration
    ///
    /// Rejects `factor < 1` and a `period` that is not a finite positive
    /// number. `min_lr <= max_lr` remains the caller's responsibility.
    pub fn validate(&self) -> Result<()> {
        if self.factor.is_nan() || self.factor < 1.0 {
            return Err(WarmRestartError::InvalidConfiguration(format!(
                "\"factor\" must be larger than 1 or equal 1, got {}",
                self.factor
            )));
        }

        if !self.period.is_finite() || self.period <= 0.0 {
            return Err(WarmRestartError::InvalidConfiguration(format!(
                "\"period\" must be a finite number > 0, got {}",
                self.period
            )));
        }

        Ok(())
    }

    /// Parse a configuration from a JSON file without validating it, so
    /// callers can apply overrides first. Missing fields take their defaults.
    pub fn read_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::read_json_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = WarmRestartConfig::default();
        assert_eq!(config.min_lr, 0.0);
        assert_eq!(config.max_lr, 0.1);
        assert_eq!(config.period, 5.0);
        assert_eq!(config.factor, 2.0);
        assert_eq!(config.restart_policy, RestartPolicy::Exact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_factor_below_one_rejected() {
        let config = WarmRestartConfig {
            factor: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WarmRestartError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_factor_one_accepted() {
        let config = WarmRestartConfig {
            factor: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nan_factor_rejected() {
        let config = WarmRestartConfig {
            factor: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_or_non_finite_period_rejected() {
        for policy in [RestartPolicy::Exact, RestartPolicy::CatchUp] {
            for period in [0.0, -5.0, f64::NAN, f64::INFINITY] {
                let config = WarmRestartConfig {
                    period,
                    restart_policy: policy,
                    ..Default::default()
                };
                assert!(
                    matches!(
                        config.validate(),
                        Err(WarmRestartError::InvalidConfiguration(_))
                    ),
                    "period {period} accepted with {policy:?}"
                );
            }
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: WarmRestartConfig =
            serde_json::from_str(r#"{"max_lr": 0.05, "restart_policy": "catch_up"}"#).unwrap();
        assert_eq!(config.max_lr, 0.05);
        assert_eq!(config.period, 5.0);
        assert_eq!(config.restart_policy, RestartPolicy::CatchUp);
    }

    fn json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file creation should succeed");
        file.write_all(content.as_bytes()).expect("file write should succeed");
        file
    }

    #[test]
    fn test_from_json_file() {
        let file = json_file(r#"{"min_lr": 0.001, "factor": 1.5}"#);
        let config = WarmRestartConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.min_lr, 0.001);
        assert_eq!(config.factor, 1.5);
    }

    #[test]
    fn test_from_json_file_rejects_invalid() {
        let file = json_file(r#"{"factor": 0.5}"#);
        assert!(matches!(
            WarmRestartConfig::from_json_file(file.path()),
            Err(WarmRestartError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_read_json_file_defers_validation() {
        let file = json_file(r#"{"factor": 0.5}"#);
        let mut config = WarmRestartConfig::read_json_file(file.path()).unwrap();
        assert_eq!(config.factor, 0.5);
        assert!(config.validate().is_err());

        config.factor = 2.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let file = json_file("{ not json");
        assert!(matches!(
            WarmRestartConfig::read_json_file(file.path()),
            Err(WarmRestartError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = WarmRestartConfig::from_json_file("/nonexistent/warm_restart.json");
        assert!(matches!(result, Err(WarmRestartError::Io(_))));
    }
}
