//! # Logging Configuration
//!
//! Configuration for the logging subsystem.
//! Supports environment variables and programmatic configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

/// Overrides the output format.
pub const LOG_FORMAT_ENV: &str = "FEEDBACK_LOG_FORMAT";
/// Enables an hourly-rolled JSON log file at the given path.
pub const LOG_FILE_ENV: &str = "FEEDBACK_LOG_FILE";
/// Deployment environment label.
pub const ENVIRONMENT_ENV: &str = "FEEDBACK_ENV";

/// Logging configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format (json, pretty, compact)
    #[serde(default = "default_format")]
    pub format: String,

    /// Optional log file path
    #[serde(default)]
    pub log_file: Option<String>,

    /// Environment (development, testing, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_level() -> String { "info".to_string() }

fn default_format() -> String { "compact".to_string() }

fn default_environment() -> String { "development".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level:       default_level(),
            format:      default_format(),
            log_file:    None,
            environment: default_environment(),
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables, falling back to the
    /// supplied values.
    pub fn from_env(level: &str, format: &str, log_file: Option<&str>) -> Self {
        Self {
            level:       std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
            format:      std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| format.to_string()),
            log_file:    std::env::var(LOG_FILE_ENV)
                .ok()
                .or(log_file.map(|s| s.to_string())),
            environment: std::env::var(ENVIRONMENT_ENV).unwrap_or_else(|_| default_environment()),
        }
    }

    /// Build the filter for this configuration. Invalid directives fall back to `info`.
    pub fn filter(&self) -> EnvFilter { EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info")) }

    /// Build the tracing subscriber from this configuration.
    ///
    /// Returns the file writer guard alongside the subscriber when a log file
    /// is configured.
    pub fn build(&self) -> (Box<dyn tracing::Subscriber + Send + Sync>, Option<WorkerGuard>) {
        let (file_layer, guard) = match self.log_file.as_deref() {
            Some(log_file) => {
                let path = Path::new(log_file);
                let directory = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "feedback-tracker.log".to_string());

                let appender = tracing_appender::rolling::hourly(directory, file_name);
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                (
                    Some(fmt::layer().json().with_writer(non_blocking)),
                    Some(guard),
                )
            },
            None => (None, None),
        };

        let registry = Registry::default().with(self.filter()).with(file_layer);

        let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = match self.format.as_str() {
            "pretty" => {
                Box::new(
                    registry.with(
                        fmt::layer()
                            .pretty()
                            .with_timer(fmt::time::UtcTime::rfc_3339()),
                    ),
                )
            },
            "compact" => {
                Box::new(
                    registry.with(
                        fmt::layer()
                            .compact()
                            .with_timer(fmt::time::UtcTime::rfc_3339()),
                    ),
                )
            },
            _ => {
                Box::new(
                    registry.with(
                        fmt::layer()
                            .json()
                            .with_timer(fmt::time::UtcTime::rfc_3339()),
                    ),
                )
            },
        };

        (subscriber, guard)
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_config_fallbacks() {
        let config = LoggingConfig::from_env("info", "json", None);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "json");
        assert_eq!(config.environment, "development");
        assert!(config.log_file.is_none());
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        // Safe in test context - env access is serialized
        unsafe {
            std::env::set_var("RUST_LOG", "debug");
            std::env::set_var(LOG_FORMAT_ENV, "pretty");
        }

        let config = LoggingConfig::from_env("info", "json", None);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, "pretty");

        // Safe in test context - cleanup after test
        unsafe {
            std::env::remove_var("RUST_LOG");
            std::env::remove_var(LOG_FORMAT_ENV);
        }
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let config = LoggingConfig {
            level: "server=verbose".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.filter().max_level_hint(),
            Some(tracing_subscriber::filter::LevelFilter::INFO)
        );
    }

    #[test]
    fn test_build_without_file_has_no_guard() {
        for format in ["json", "pretty", "compact"] {
            let config = LoggingConfig {
                format: format.to_string(),
                ..Default::default()
            };
            let (_subscriber, guard) = config.build();
            assert!(guard.is_none());
        }
    }
}
