//! # Database Migrator
//!
//! Sea-ORM migrator listing every schema migration in order.

use sea_orm_migration::prelude::*;

use crate::{
    m20250601_000001_create_users_table,
    m20250601_000002_create_tags_table,
    m20250601_000003_create_feedback_table,
    m20250601_000004_create_feedback_requests_table,
};

/// The main migrator that coordinates all migration operations
///
/// # Example
///
/// ```rust,ignore
/// use migration::{Migrator, MigratorTrait};
///
/// Migrator::up(&db, None).await?;
/// ```
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    /// Migrations are executed in the order they appear in this list.
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users_table::Migration),
            Box::new(m20250601_000002_create_tags_table::Migration),
            Box::new(m20250601_000003_create_feedback_table::Migration),
            Box::new(m20250601_000004_create_feedback_requests_table::Migration),
        ]
    }
}
