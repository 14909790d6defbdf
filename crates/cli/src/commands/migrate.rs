//! # CLI Migration Command
//!
//! Applies or rolls back schema migrations, optionally seeding demo data.

use auth::PasswordConfig;
use error::{AppError, Result};
use migration::MigratorTrait as _;
use tracing::info;

use crate::commands::MigrateArgs;

/// Runs database migrations
///
/// # Arguments
///
/// * `args` - Migrate command arguments
///
/// # Errors
///
/// Connection, migration or seeding failures.
pub async fn migrate(args: &MigrateArgs) -> Result<()> {
    info!(
        target: "migrate",
        url = %args.database.database_url,
        rollback = args.rollback,
        seed = args.seed,
        "Running database migrations..."
    );

    let db = args.database.to_config().connect().await?;

    if args.rollback {
        migration::Migrator::down(&db, Some(1))
            .await
            .map_err(|e| AppError::migration(format!("Failed to rollback migration: {}", e)))?;

        info!(target: "migrate", "Rollback completed successfully");
        return Ok(());
    }

    let pending = migration::Migrator::get_pending_migrations(&db)
        .await
        .map_err(|e| AppError::migration(format!("Failed to list pending migrations: {}", e)))?;
    for m in &pending {
        info!(target: "migrate", migration = %m.name(), "Applying");
    }

    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::migration(format!("Failed to run migrations: {}", e)))?;

    info!(target: "migrate", applied = pending.len(), "Migrations completed successfully");

    if args.seed {
        let results = migration::run_all_seeds(&db, &PasswordConfig::default()).await?;
        for result in results {
            info!(
                target: "migrate",
                seed = %result.seed_name,
                inserted = result.inserted_count,
                skipped = result.skipped_count,
                "Seed applied"
            );
        }
    }

    Ok(())
}
