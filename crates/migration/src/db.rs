//! # Database Connection Management
//!
//! Connection settings for the SQLite store. Every connection in the pool is
//! opened with foreign keys enforced and a busy timeout, so concurrent writers
//! wait for the lock instead of failing immediately.

use std::time::Duration;

use ::error::AppError;
use sea_orm::{
    ConnectOptions,
    Database,
    DatabaseConnection,
    sqlx::sqlite::{SqliteJournalMode, SqliteSynchronous},
};
use sea_orm_migration::MigratorTrait;

use crate::Migrator;

/// Default on-disk database location.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://feedback_tracker.db?mode=rwc";

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url:             String,
    /// Maximum connections in pool
    pub pool_size:       u32,
    /// How long a connection waits for a write lock before reporting busy
    pub busy_timeout:    Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// How long a caller waits for a pooled connection
    pub acquire_timeout: Duration,
    /// Use write-ahead logging (file databases only)
    pub wal:             bool,
}

impl DatabaseConfig {
    /// Creates a new configuration with default values
    ///
    /// # Returns
    ///
    /// A `DatabaseConfig` pointing at `feedback_tracker.db` in the working
    /// directory with a pool of five connections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            url:             DEFAULT_DATABASE_URL.to_string(),
            pool_size:       5,
            busy_timeout:    Duration::from_secs(5),
            connect_timeout: Duration::from_secs(30),
            acquire_timeout: Duration::from_secs(30),
            wal:             true,
        }
    }

    /// A private in-memory database.
    ///
    /// The pool holds a single connection because every SQLite memory
    /// connection would otherwise see its own empty database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            wal: false,
            ..Self::new()
        }
    }

    /// Sets the connection URL
    #[must_use]
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    /// Sets the connection pool size
    ///
    /// # Arguments
    ///
    /// * `pool_size` - Maximum number of connections in the pool
    #[must_use]
    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    /// Sets the lock wait applied to every connection
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets the connection timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enables or disables write-ahead logging
    #[must_use]
    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }

    /// Settings for the write pool: one connection that waits at most the
    /// busy timeout to be handed out.
    ///
    /// SQLite admits a single writer. A deferred transaction that has
    /// already read gets `SQLITE_BUSY` without waiting when it tries to write
    /// under another writer, so writers queue on this pool instead of racing
    /// for the file lock.
    #[must_use]
    pub fn writer(&self) -> Self {
        Self {
            pool_size: 1,
            acquire_timeout: self.busy_timeout,
            ..self.clone()
        }
    }

    /// Whether the URL points at a memory database.
    pub fn is_memory(&self) -> bool { self.url.contains(":memory:") || self.url.contains("mode=memory") }

    /// Builds Sea-ORM connect options from this configuration
    #[must_use]
    pub fn connect_options(&self) -> ConnectOptions {
        let busy_timeout = self.busy_timeout;
        let wal = self.wal && !self.is_memory();

        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(self.pool_size)
            .min_connections(1)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .sqlx_logging(false)
            .map_sqlx_sqlite_opts(move |opts| {
                let opts = opts
                    .foreign_keys(true)
                    .create_if_missing(true)
                    .busy_timeout(busy_timeout);
                if wal {
                    opts.journal_mode(SqliteJournalMode::Wal)
                        .synchronous(SqliteSynchronous::Normal)
                }
                else {
                    opts
                }
            });
        options
    }

    /// Creates a database connection from this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails.
    pub async fn connect(&self) -> Result<DatabaseConnection, AppError> {
        tracing::debug!(url = %self.url, pool_size = self.pool_size, "Connecting to database");
        Database::connect(self.connect_options())
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {}", e)))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self { Self::new() }
}

/// Connects and applies every pending migration.
///
/// # Errors
///
/// Returns an error if the connection or any migration fails.
pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<DatabaseConnection, AppError> {
    let db = config.connect().await?;
    Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::migration(format!("Failed to apply migrations: {}", e)))?;
    tracing::info!("Database schema is up to date");
    Ok(db)
}

/// Opens the connection every durable write goes through.
///
/// A memory database is private to its connection, so it shares `readers`.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn connect_writer(config: &DatabaseConfig, readers: &DatabaseConnection) -> Result<DatabaseConnection, AppError> {
    if config.is_memory() {
        return Ok(readers.clone());
    }
    config.writer().connect().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::new();
        assert_eq!(config.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.pool_size, 5);
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert!(config.wal);
        assert!(!config.is_memory());
    }

    #[test]
    fn test_database_config_builder() {
        let config = DatabaseConfig::new()
            .with_url("sqlite:///var/lib/feedback/data.db?mode=rwc")
            .with_pool_size(0)
            .with_busy_timeout(Duration::from_millis(250))
            .with_wal(false);

        assert_eq!(config.url, "sqlite:///var/lib/feedback/data.db?mode=rwc");
        assert_eq!(config.pool_size, 1);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.wal);
    }

    #[test]
    fn test_in_memory_uses_single_connection() {
        let config = DatabaseConfig::in_memory();
        assert!(config.is_memory());
        assert_eq!(config.pool_size, 1);
        assert!(!config.wal);
    }

    #[test]
    fn test_writer_is_single_connection() {
        let config = DatabaseConfig::new()
            .with_pool_size(8)
            .with_busy_timeout(Duration::from_secs(2));
        let writer = config.writer();

        assert_eq!(writer.pool_size, 1);
        assert_eq!(writer.acquire_timeout, Duration::from_secs(2));
        assert_eq!(writer.url, config.url);
        assert!(writer.wal);
    }

    #[tokio::test]
    async fn test_connect_and_migrate_in_memory() {
        let db = connect_and_migrate(&DatabaseConfig::in_memory()).await.unwrap();
        let applied = Migrator::get_applied_migrations(&db).await.unwrap();
        assert_eq!(applied.len(), Migrator::migrations().len());
    }
}
