//! Configuration for gradient computation.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `QSHIFT_GRAD_` prefix)
//!
//! Environment variables take precedence over file values, which take
//! precedence over defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable toggling parallel gradient components.
pub const ENV_PARALLEL: &str = "QSHIFT_GRAD_PARALLEL";

/// Environment variable for the parallel threshold.
pub const ENV_MIN_PARALLEL_VARIABLES: &str = "QSHIFT_GRAD_MIN_PARALLEL_VARIABLES";

/// Settings for [`grad_with`](crate::grad_with).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientConfig {
    /// Compute the per-variable components in parallel.
    ///
    /// Has no effect unless the `rayon` feature is enabled.
    #[serde(default)]
    pub parallel: bool,

    /// Circuits with fewer variables than this are always processed
    /// sequentially.
    #[serde(default = "default_min_parallel_variables")]
    pub min_parallel_variables: usize,
}

fn default_min_parallel_variables() -> usize {
    4
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            min_parallel_variables: default_min_parallel_variables(),
        }
    }
}

impl GradientConfig {
    /// A configuration with parallel components enabled.
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: GradientConfig =
            serde_yaml_ng::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml_str(&contents)
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Apply `QSHIFT_GRAD_*` environment variables on top of this configuration.
    ///
    /// Only variables that are set override the current values.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(v) = std::env::var(ENV_PARALLEL) {
            self.parallel = parse_bool(ENV_PARALLEL, &v)?;
        }
        if let Ok(v) = std::env::var(ENV_MIN_PARALLEL_VARIABLES) {
            self.min_parallel_variables = v.parse().map_err(|_| {
                ConfigError::ParseError(format!("{ENV_MIN_PARALLEL_VARIABLES}: invalid count '{v}'"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the configuration for invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_parallel_variables == 0 {
            return Err(ConfigError::ValidationError(
                "min_parallel_variables must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::ParseError(format!(
            "{key}: expected a boolean, got '{value}'"
        ))),
    }
}

/// Errors from loading or validating a [`GradientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
