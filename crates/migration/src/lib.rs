//! # Feedback Tracker Migrations
//!
//! Schema migrations for the SQLite store, connection configuration and the
//! demo seed data loaded on first start.

pub use sea_orm_migration::prelude::*;

pub mod db;
pub mod migrator;
pub mod seeds;

mod m20250601_000001_create_users_table;
mod m20250601_000002_create_tags_table;
mod m20250601_000003_create_feedback_table;
mod m20250601_000004_create_feedback_requests_table;

pub use db::{DatabaseConfig, connect_and_migrate, connect_writer};
pub use seeds::run_all_seeds;
pub use migrator::Migrator;
