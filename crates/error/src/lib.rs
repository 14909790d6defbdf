//! # Feedback Tracker Error Infrastructure
//!
//! A single application error type shared by every crate, its mapping onto
//! HTTP status codes and the JSON error body returned to clients.

pub mod rejection;
pub mod response;
pub mod traits;

pub use response::ErrorResponse;
pub use traits::ResultExt;

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Substrings SQLite uses when a writer cannot obtain its lock in time.
const CONTENTION_SIGNALS: &[&str] = &[
    "database is locked",
    "database table is locked",
    "sqlite_busy",
    "sqlite_locked",
];

/// Main application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound {
        message: String,
    },

    #[error("BadRequest: {message}")]
    BadRequest {
        message: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    #[error("JwtExpired: Token has expired")]
    JwtExpired,

    #[error("JwtInvalidSignature: Invalid token signature")]
    JwtInvalidSignature,

    #[error("JwtInvalidToken: Invalid token")]
    JwtInvalidToken,

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    #[error("Validation: {message}")]
    Validation {
        message: String,
    },

    /// The store could not grant a write lock within its busy timeout.
    #[error("StorageBusy: {message}")]
    StorageBusy {
        message: String,
    },

    #[error("Internal: {message}")]
    Internal {
        message: String,
    },

    #[error("Database: {message}")]
    Database {
        message: String,
    },

    #[error("IO: {message}")]
    Io {
        message: String,
    },

    #[error("Config: {message}")]
    Config {
        message: String,
    },

    #[error("Migration: {message}")]
    Migration {
        message: String,
    },
}

/// Seed operation result
#[derive(Debug, Clone)]
pub struct SeedResult {
    /// Number of records inserted
    pub inserted_count: usize,
    /// Number of records skipped because they already existed
    pub skipped_count:  usize,
    /// Seed name for logging
    pub seed_name:      String,
    /// Duration of the seed operation in milliseconds
    pub duration_ms:    u64,
}

impl SeedResult {
    /// Creates a new successful seed result
    #[must_use]
    pub fn success(seed_name: &str, inserted: usize, skipped: usize, duration_ms: u64) -> Self {
        Self {
            inserted_count: inserted,
            skipped_count: skipped,
            seed_name: seed_name.to_string(),
            duration_ms,
        }
    }
}

impl AppError {
    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl ToString) -> Self {
        Self::NotFound {
            message: resource.to_string(),
        }
    }

    /// Create a bad request error.
    #[inline]
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest {
            message: message.to_string(),
        }
    }

    /// Create an unauthorized error.
    #[inline]
    pub fn unauthorized(message: impl ToString) -> Self {
        Self::Unauthorized {
            message: message.to_string(),
        }
    }

    /// Create a forbidden error.
    #[inline]
    pub fn forbidden(message: impl ToString) -> Self {
        Self::Forbidden {
            message: message.to_string(),
        }
    }

    /// Create a conflict error.
    #[inline]
    pub fn conflict(message: impl ToString) -> Self {
        Self::Conflict {
            message: message.to_string(),
        }
    }

    /// Create a validation error.
    #[inline]
    pub fn validation(message: impl ToString) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create a storage contention error.
    #[inline]
    pub fn storage_busy(message: impl ToString) -> Self {
        Self::StorageBusy {
            message: message.to_string(),
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Create a migration error.
    #[inline]
    pub fn migration(message: impl ToString) -> Self {
        Self::Migration {
            message: message.to_string(),
        }
    }

    /// Whether retrying the same unit of work on a fresh session may succeed.
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::StorageBusy {
                ..
            }
        )
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> http::StatusCode {
        match self {
            AppError::NotFound {
                ..
            } => http::StatusCode::NOT_FOUND,
            AppError::BadRequest {
                ..
            } => http::StatusCode::BAD_REQUEST,
            AppError::Unauthorized {
                ..
            } => http::StatusCode::UNAUTHORIZED,
            AppError::JwtExpired => http::StatusCode::UNAUTHORIZED,
            AppError::JwtInvalidSignature => http::StatusCode::UNAUTHORIZED,
            AppError::JwtInvalidToken => http::StatusCode::UNAUTHORIZED,
            AppError::Forbidden {
                ..
            } => http::StatusCode::FORBIDDEN,
            AppError::Conflict {
                ..
            } => http::StatusCode::CONFLICT,
            AppError::Validation {
                ..
            } => http::StatusCode::BAD_REQUEST,
            AppError::StorageBusy {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Database {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Io {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Migration {
                ..
            } => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound {
                ..
            } => "NOT_FOUND",
            AppError::BadRequest {
                ..
            } => "BAD_REQUEST",
            AppError::Unauthorized {
                ..
            } => "UNAUTHORIZED",
            AppError::JwtExpired => "JWT_EXPIRED",
            AppError::JwtInvalidSignature => "JWT_INVALID_SIGNATURE",
            AppError::JwtInvalidToken => "JWT_INVALID_TOKEN",
            AppError::Forbidden {
                ..
            } => "FORBIDDEN",
            AppError::Conflict {
                ..
            } => "CONFLICT",
            AppError::Validation {
                ..
            } => "VALIDATION_ERROR",
            AppError::StorageBusy {
                ..
            } => "STORAGE_BUSY",
            AppError::Internal {
                ..
            } => "INTERNAL_ERROR",
            AppError::Database {
                ..
            } => "DATABASE_ERROR",
            AppError::Io {
                ..
            } => "IO_ERROR",
            AppError::Config {
                ..
            } => "CONFIG_ERROR",
            AppError::Migration {
                ..
            } => "MIGRATION_ERROR",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::JwtExpired => "Token has expired".to_string(),
            AppError::JwtInvalidSignature => "Invalid token signature".to_string(),
            AppError::JwtInvalidToken => "Invalid token".to_string(),
            AppError::NotFound {
                message,
            } |
            AppError::BadRequest {
                message,
            } |
            AppError::Unauthorized {
                message,
            } |
            AppError::Forbidden {
                message,
            } |
            AppError::Conflict {
                message,
            } |
            AppError::Validation {
                message,
            } |
            AppError::StorageBusy {
                message,
            } |
            AppError::Internal {
                message,
            } |
            AppError::Database {
                message,
            } |
            AppError::Io {
                message,
            } |
            AppError::Config {
                message,
            } |
            AppError::Migration {
                message,
            } => message.clone(),
        }
    }

    /// Add context to the error.
    ///
    /// JWT variants carry fixed messages and are returned unchanged.
    #[inline]
    pub fn context(mut self, context: impl ToString) -> Self {
        match &mut self {
            AppError::JwtExpired | AppError::JwtInvalidSignature | AppError::JwtInvalidToken => {},
            AppError::NotFound {
                message,
            } |
            AppError::BadRequest {
                message,
            } |
            AppError::Unauthorized {
                message,
            } |
            AppError::Forbidden {
                message,
            } |
            AppError::Conflict {
                message,
            } |
            AppError::Validation {
                message,
            } |
            AppError::StorageBusy {
                message,
            } |
            AppError::Internal {
                message,
            } |
            AppError::Database {
                message,
            } |
            AppError::Io {
                message,
            } |
            AppError::Config {
                message,
            } |
            AppError::Migration {
                message,
            } => {
                *message = format!("{}: {}", context.to_string(), message);
            },
        }
        self
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convert Sea-ORM database errors to AppError.
///
/// Lock contention and pool exhaustion become [`AppError::StorageBusy`] so
/// the write coordinator can retry them; unique violations become conflicts.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        if is_contention(&err) {
            return Self::StorageBusy {
                message: err.to_string(),
            };
        }

        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return Self::Conflict {
                message: format!("Duplicate value: {}", detail),
            };
        }

        match err {
            sea_orm::DbErr::RecordNotFound(message) => {
                Self::NotFound {
                    message,
                }
            },
            other => {
                Self::Database {
                    message: other.to_string(),
                }
            },
        }
    }
}

/// Returns true when the error is SQLite signalling writer-lock contention.
fn is_contention(err: &sea_orm::DbErr) -> bool {
    if matches!(
        err,
        sea_orm::DbErr::ConnectionAcquire(sea_orm::ConnAcquireErr::Timeout)
    ) {
        return true;
    }

    let message = err.to_string().to_lowercase();
    CONTENTION_SIGNALS
        .iter()
        .any(|signal| message.contains(signal))
}

/// Convert validator validation errors to AppError.
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| format!("{}: invalid value", field))
                })
            })
            .collect();
        messages.sort();

        let message = if messages.is_empty() {
            "Validation failed".to_string()
        }
        else {
            messages.join(", ")
        };

        Self::Validation {
            message,
        }
    }
}
