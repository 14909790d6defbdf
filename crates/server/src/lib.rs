//! # Feedback Tracker API Server
//!
//! Axum-based HTTP API for manager-to-employee feedback.
//!
//! ## Modules
//!
//! - [`durable`]: Transactional writes with contention retry
//! - [`dto`]: Request/response data transfer objects
//! - [`handlers`]: Endpoint logic
//! - [`middleware`]: Authentication and request logging
//! - [`notifications`]: Best-effort email delivery
//! - [`router`]: API route configuration

use std::{sync::Arc, time::Instant};

use ::auth::{JwtConfig, PasswordConfig, hash_password, secrecy::{ExposeSecret, SecretString}};
use error::{AppError, Result};
use rand::Rng;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

pub mod dto;
pub mod durable;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod router;
pub mod views;

pub use durable::{RetryPolicy, SessionSource, UnitOfWork, execute_with_retry};
pub use notifications::{LogMailer, Mailer};
pub use router::create_app_router;

/// Application state shared across request handlers
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Read pool
    pub db:              DatabaseConnection,
    /// Single-connection pool every durable write goes through
    pub writer:          DatabaseConnection,
    /// JWT configuration
    pub jwt_config:      JwtConfig,
    /// Argon2 parameters for new passwords
    pub password_config: PasswordConfig,
    /// Retry budget for durable writes
    pub retry_policy:    RetryPolicy,
    /// Outgoing mail transport
    pub mailer:          Arc<dyn Mailer>,
    /// Server start time for uptime calculation
    pub start_time:      Instant,
    /// Hash of a random secret checked when a login email is unknown
    login_decoy:         Arc<OnceCell<String>>,
}

impl AppState {
    /// Creates state with default hashing, retry and mail settings.
    ///
    /// Writes share `db` until [`AppState::with_writer`] supplies a
    /// dedicated connection.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_config: JwtConfig) -> Self {
        Self {
            writer: db.clone(),
            db,
            jwt_config,
            password_config: PasswordConfig::default(),
            retry_policy: RetryPolicy::default(),
            mailer: Arc::new(LogMailer::default()),
            start_time: Instant::now(),
            login_decoy: Arc::default(),
        }
    }

    #[must_use]
    pub fn with_writer(mut self, writer: DatabaseConnection) -> Self {
        self.writer = writer;
        self
    }

    #[must_use]
    pub fn with_password_config(mut self, password_config: PasswordConfig) -> Self {
        self.password_config = password_config;
        self.login_decoy = Arc::default();
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    /// Argon2 hash that no submitted password matches, built with the
    /// configured parameters on first use.
    ///
    /// Logins for unknown emails verify against it so they cost the same as
    /// a wrong password.
    ///
    /// # Errors
    ///
    /// Returns an internal error if hashing fails.
    pub async fn login_decoy_hash(&self) -> Result<&str> {
        let hash = self
            .login_decoy
            .get_or_try_init(|| {
                let config = self.password_config.clone();
                async move {
                    tokio::task::spawn_blocking(move || {
                        let secret = SecretString::from(format!("{:032x}", rand::rng().random::<u128>()));
                        hash_password(&secret, Some(config)).map(|hash| hash.expose_secret().to_string())
                    })
                    .await
                    .map_err(|e| AppError::internal(format!("Decoy hashing task failed: {}", e)))?
                    .map_err(AppError::from)
                }
            })
            .await?;
        Ok(hash.as_str())
    }

    /// Whether the login decoy has been built.
    pub fn login_decoy_ready(&self) -> bool { self.login_decoy.initialized() }
}
