//! Runtime configuration read from `GLUCOSENSE_*` environment variables.

use std::path::PathBuf;

use crate::GlucosenseError;

pub const MODEL_PATH_ENV: &str = "GLUCOSENSE_MODEL_PATH";
pub const MODEL_SHA256_ENV: &str = "GLUCOSENSE_MODEL_SHA256";
pub const ENFORCE_UPPER_BOUNDS_ENV: &str = "GLUCOSENSE_ENFORCE_UPPER_BOUNDS";
pub const LOG_MODE_ENV: &str = "GLUCOSENSE_LOG_MODE";
pub const LOG_FILE_ENV: &str = "GLUCOSENSE_LOG_FILE";

const DEFAULT_MODEL_PATH: &str = "models/diabetes_model.json";
const DEFAULT_LOG_FILE: &str = "glucosense.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when attached to a terminal (the TUI owns the screen), stdout otherwise
    Auto,
    File,
    Stdout,
    Stderr,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            "stderr" => Self::Stderr,
            _ => Self::Auto,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub mode: LogMode,
    pub file: PathBuf,
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Model artifact file, or a directory containing `diabetes_model.json`
    pub model_path: PathBuf,

    /// Optional lowercase hex SHA-256 the artifact must match
    pub model_sha256: Option<String>,

    /// Whether form widgets reject values above their upper bound
    pub enforce_upper_bounds: bool,

    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_sha256: None,
            enforce_upper_bounds: true,
            log: LogConfig {
                mode: LogMode::Auto,
                file: PathBuf::from(DEFAULT_LOG_FILE),
            },
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `GlucosenseError::Config` if a value is malformed.
    pub fn from_env() -> Result<Self, GlucosenseError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `GlucosenseError::Config` if a value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GlucosenseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let model_path = lookup(MODEL_PATH_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);

        let model_sha256 = match lookup(MODEL_SHA256_ENV) {
            Some(v) if !v.trim().is_empty() => Some(parse_sha256(&v)?),
            _ => None,
        };

        let enforce_upper_bounds = parse_bool(
            lookup(ENFORCE_UPPER_BOUNDS_ENV).as_deref(),
            defaults.enforce_upper_bounds,
        );

        let mode = lookup(LOG_MODE_ENV)
            .map(|v| LogMode::parse(&v))
            .unwrap_or(LogMode::Auto);
        let file = lookup(LOG_FILE_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.log.file);

        Ok(Self {
            model_path,
            model_sha256,
            enforce_upper_bounds,
            log: LogConfig { mode, file },
        })
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

fn parse_sha256(value: &str) -> Result<String, GlucosenseError> {
    let digest = value.trim().to_ascii_lowercase();
    if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(GlucosenseError::Config(format!(
            "{MODEL_SHA256_ENV} must be 64 hex characters"
        )));
    }
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, GlucosenseError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).expect("Should build");
        assert_eq!(config, AppConfig::default());
        assert!(config.enforce_upper_bounds);
        assert_eq!(config.log.mode, LogMode::Auto);
    }

    #[test]
    fn test_overrides() {
        let digest = "AB".repeat(32);
        let config = config_from(&[
            (MODEL_PATH_ENV, "/opt/models"),
            (MODEL_SHA256_ENV, &digest),
            (ENFORCE_UPPER_BOUNDS_ENV, "No"),
            (LOG_MODE_ENV, "STDERR"),
            (LOG_FILE_ENV, "/tmp/g.log"),
        ])
        .expect("Should build");

        assert_eq!(config.model_path, PathBuf::from("/opt/models"));
        assert_eq!(config.model_sha256.as_deref(), Some("ab".repeat(32).as_str()));
        assert!(!config.enforce_upper_bounds);
        assert_eq!(config.log.mode, LogMode::Stderr);
        assert_eq!(config.log.file, PathBuf::from("/tmp/g.log"));
    }

    #[test]
    fn test_unrecognized_bool_keeps_default() {
        let config = config_from(&[(ENFORCE_UPPER_BOUNDS_ENV, "maybe")]).expect("Should build");
        assert!(config.enforce_upper_bounds);
    }

    #[test]
    fn test_empty_digest_is_unset() {
        let config = config_from(&[(MODEL_SHA256_ENV, "  ")]).expect("Should build");
        assert!(config.model_sha256.is_none());
    }

    #[test]
    fn test_malformed_digest() {
        let err = config_from(&[(MODEL_SHA256_ENV, "not-a-digest")]).expect_err("Should fail");
        assert!(matches!(err, GlucosenseError::Config(_)));
    }
}
