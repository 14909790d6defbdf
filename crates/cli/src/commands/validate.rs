//! # CLI Validate Command
//!
//! Checks the serve configuration and that the database is reachable.

use error::{AppError, Result};
use migration::MigratorTrait as _;
use tracing::info;

use crate::{commands::ServeArgs, config::ServeConfig};

/// Validates what `serve` would run with
///
/// # Errors
///
/// Invalid configuration or an unreachable database.
pub async fn validate(args: &ServeArgs) -> Result<()> {
    let config = ServeConfig::try_from(args)?;
    info!(
        target: "validate",
        address = %config.address,
        database = %config.database.url,
        pool_size = config.database.pool_size,
        retry_attempts = config.retry_policy.max_attempts,
        "Configuration is valid"
    );

    let db = config.database.connect().await?;
    let pending = migration::Migrator::get_pending_migrations(&db)
        .await
        .map_err(|e| AppError::migration(format!("Failed to list pending migrations: {}", e)))?;

    info!(target: "validate", pending_migrations = pending.len(), "Database is reachable");
    Ok(())
}
