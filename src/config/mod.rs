//! Runtime configuration read from the process environment.
//!
//! The service is configured exclusively through environment variables,
//! read once at startup: `HOST`, `PORT`, `LOG_LEVEL`, `LOG_FORMAT`.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),
}

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Host or address to bind (`HOST`).
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind (`PORT`).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level filter (`LOG_LEVEL`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format (`LOG_FORMAT`).
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Read configuration from the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    Ok(envy::from_env::<Config>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_explicit_values() {
        let vars = vec![
            ("HOST".to_string(), "127.0.0.1".to_string()),
            ("PORT".to_string(), "9090".to_string()),
            ("LOG_LEVEL".to_string(), "debug".to_string()),
            ("LOG_FORMAT".to_string(), "json".to_string()),
        ];

        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port() {
        let vars = vec![("PORT".to_string(), "not-a-port".to_string())];
        let result: Result<Config, _> = envy::from_iter(vars);
        assert!(result.is_err());
    }
}
