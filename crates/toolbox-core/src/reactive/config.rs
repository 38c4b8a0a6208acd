#![forbid(unsafe_code)]

//! Observable tuning, with environment overrides.
//!
//! Environment variables:
//! - `TOOLBOX_REENTRANCY_WARN_DEPTH` (positive integer)

use std::env;
use std::fmt;

/// Environment variable overriding [`ObservableConfig::reentrancy_warn_depth`].
pub const ENV_REENTRANCY_WARN_DEPTH: &str = "TOOLBOX_REENTRANCY_WARN_DEPTH";

/// Default nesting depth above which re-entrant notification is reported.
pub const DEFAULT_REENTRANCY_WARN_DEPTH: usize = 16;

/// Tuning knobs for [`Observable`](super::Observable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservableConfig {
    /// Nested notification depth above which a `warn` event is emitted
    /// (with the `tracing` feature). Notification itself is never cut short.
    pub reentrancy_warn_depth: usize,
}

impl Default for ObservableConfig {
    fn default() -> Self {
        Self {
            reentrancy_warn_depth: DEFAULT_REENTRANCY_WARN_DEPTH,
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: ObservableConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ObservableConfig {
    /// Parse config from environment variables. Invalid values are ignored
    /// and the defaults kept.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Set the re-entrancy warning threshold.
    #[must_use]
    pub fn with_reentrancy_warn_depth(mut self, depth: usize) -> Self {
        self.reentrancy_warn_depth = depth;
        self
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.reentrancy_warn_depth == 0 {
            errors.push(ConfigError::new(
                "reentrancy_warn_depth",
                "0",
                "must be at least 1",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn from_env_with<F>(mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = ObservableConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_REENTRANCY_WARN_DEPTH) {
        match parse_usize(&value) {
            Some(parsed) if parsed > 0 => config.reentrancy_warn_depth = parsed,
            _ => errors.push(ConfigError::new(
                "reentrancy_warn_depth",
                value,
                "expected positive integer",
            )),
        }
    }

    ConfigParse { config, errors }
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(vars: &[(&str, &str)]) -> ConfigParse {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        from_env_with(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let parsed = parse(&[]);
        assert_eq!(parsed.config, ObservableConfig::default());
        assert!(parsed.errors.is_empty());
        assert_eq!(
            parsed.config.reentrancy_warn_depth,
            DEFAULT_REENTRANCY_WARN_DEPTH
        );
    }

    #[test]
    fn reads_warn_depth() {
        let parsed = parse(&[(ENV_REENTRANCY_WARN_DEPTH, " 4 ")]);
        assert_eq!(parsed.config.reentrancy_warn_depth, 4);
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn rejects_garbage_and_keeps_default() {
        let parsed = parse(&[(ENV_REENTRANCY_WARN_DEPTH, "deep")]);
        assert_eq!(
            parsed.config.reentrancy_warn_depth,
            DEFAULT_REENTRANCY_WARN_DEPTH
        );
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].field, "reentrancy_warn_depth");
        assert_eq!(parsed.errors[0].value, "deep");
    }

    #[test]
    fn rejects_zero() {
        let parsed = parse(&[(ENV_REENTRANCY_WARN_DEPTH, "0")]);
        assert_eq!(
            parsed.config.reentrancy_warn_depth,
            DEFAULT_REENTRANCY_WARN_DEPTH
        );
        assert_eq!(parsed.errors.len(), 1);
    }

    #[test]
    fn validate_flags_zero_depth() {
        let config = ObservableConfig::default().with_reentrancy_warn_depth(0);
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "reentrancy_warn_depth=0 (must be at least 1)"
        );
        assert!(ObservableConfig::default().validate().is_ok());
    }
}
