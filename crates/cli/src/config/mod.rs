//! # Runtime Configuration
//!
//! Turns parsed command-line arguments into the plain configuration structs
//! the server and storage crates expect.

use std::{net::SocketAddr, time::Duration};

use auth::JwtConfig;
use error::AppError;
use migration::DatabaseConfig;
use server::RetryPolicy;

use crate::commands::{DatabaseArgs, JwtArgs, ServeArgs};

/// Shortest signing secret accepted, in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Errors found while building configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT secret is required (set FEEDBACK_JWT_SECRET)")]
    MissingJwtSecret,

    #[error("JWT secret must be at least 32 bytes, got {length}")]
    WeakJwtSecret {
        length: usize,
    },

    #[error("JWT lifetime must be positive")]
    ZeroJwtExpiration,

    #[error("Invalid listen address {host}:{port}")]
    InvalidAddress {
        host: String,
        port: u16,
    },

    #[error("Database pool size must be at least 1")]
    EmptyPool,
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self { AppError::config(err.to_string()) }
}

impl DatabaseArgs {
    pub fn to_config(&self) -> DatabaseConfig {
        DatabaseConfig::new()
            .with_url(&self.database_url)
            .with_pool_size(self.pool_size)
            .with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

impl JwtArgs {
    /// Builds the signing configuration.
    ///
    /// # Errors
    ///
    /// Missing or short secrets and a zero lifetime.
    pub fn to_config(&self) -> Result<JwtConfig, ConfigError> {
        let secret = self
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingJwtSecret)?;

        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::WeakJwtSecret {
                length: secret.len(),
            });
        }
        if self.jwt_expiration_seconds == 0 {
            return Err(ConfigError::ZeroJwtExpiration);
        }

        Ok(JwtConfig::for_secret(secret)
            .with_issuer_and_audience(&self.jwt_issuer, &self.jwt_audience)
            .with_expiration(self.jwt_expiration_seconds))
    }
}

/// Everything `serve` needs, checked up front.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub address:      SocketAddr,
    pub database:     DatabaseConfig,
    pub jwt:          JwtConfig,
    pub retry_policy: RetryPolicy,
    pub app_url:      String,
    pub seed:         bool,
}

impl TryFrom<&ServeArgs> for ServeConfig {
    type Error = ConfigError;

    fn try_from(args: &ServeArgs) -> Result<Self, Self::Error> {
        if args.database.pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }

        let address = parse_socket_addr(&args.host, args.port).map_err(|_| {
            ConfigError::InvalidAddress {
                host: args.host.clone(),
                port: args.port,
            }
        })?;

        Ok(Self {
            address,
            database: args.database.to_config(),
            jwt: args.jwt.to_config()?,
            retry_policy: RetryPolicy::new(
                args.retry_attempts,
                Duration::from_millis(args.retry_base_delay_ms),
            ),
            app_url: args.app_url.clone(),
            seed: args.seed,
        })
    }
}

/// Parses a host and port into a SocketAddr.
///
/// # Arguments
///
/// * `host` - The host string to parse
/// * `port` - The port number
///
/// # Returns
///
/// A `Result` containing the parsed `SocketAddr` or an error if parsing fails.
pub fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    // IPv6 addresses must be wrapped in brackets when appending a port
    let addr_str = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    }
    else {
        format!("{}:{}", host, port)
    };
    addr_str.parse()
}
