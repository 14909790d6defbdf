//! # Feedback Tracker Logging Infrastructure
//!
//! Structured logging utilities built on `tracing`.
//! Provides JSON, pretty and compact output, environment-based overrides
//! and request id helpers used by the HTTP layer.

pub mod config;
pub mod macros;
pub mod request_id;

pub use config::LoggingConfig;
pub use request_id::{REQUEST_ID_HEADER, RequestId};
pub use tracing::{debug, error, info, trace, warn};
pub use tracing_appender::non_blocking::WorkerGuard;

/// Error returned when the global subscriber cannot be installed.
pub type InitError = tracing::subscriber::SetGlobalDefaultError;

/// Initialize the logging system.
///
/// # Arguments
///
/// * `level` - Log level or filter directive (debug, info, `server=debug`)
/// * `format` - Output format (json, pretty, compact)
/// * `log_file` - Optional path to log file
///
/// # Returns
///
/// The file writer guard when a log file is configured. It must be kept alive
/// for as long as logs should be flushed to the file.
pub fn init(level: &str, format: &str, log_file: Option<&str>) -> Result<Option<WorkerGuard>, InitError> {
    init_with_config(LoggingConfig::from_env(level, format, log_file))
}

/// Initialize logging with a custom configuration.
pub fn init_with_config(config: LoggingConfig) -> Result<Option<WorkerGuard>, InitError> {
    let (subscriber, guard) = config.build();
    tracing::subscriber::set_global_default(subscriber)?;
    info!(level = %config.level, format = %config.format, "Logging initialized");
    Ok(guard)
}
