//! # Seed Data Management
//!
//! Demo accounts and the default tag catalog loaded into a fresh database.

use std::time::Instant;

use ::error::{AppError, SeedResult};
use auth::{PasswordConfig, hash_password, secrecy::{ExposeSecret, SecretString}};
use chrono::Utc;
use entity::{sea_orm_active_enums::UserRole, tags, users};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "password123";

/// Default tags and their display colors.
pub const DEFAULT_TAGS: &[(&str, &str)] = &[
    ("Communication", "#3B82F6"),
    ("Leadership", "#10B981"),
    ("Technical Skills", "#8B5CF6"),
    ("Teamwork", "#F59E0B"),
    ("Problem Solving", "#EF4444"),
    ("Time Management", "#6B7280"),
];

/// Trait for seed data providers
#[async_trait::async_trait]
pub trait SeedProvider: Send + Sync {
    /// The name of this seed
    fn name(&self) -> &str;

    /// Runs the seed operation. Providers must be safe to run repeatedly.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed operation fails.
    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError>;
}

/// One manager and two employees reporting to them, all pre-verified.
#[derive(Debug, Clone, Default)]
pub struct DemoUsersSeed {
    pub password_config: PasswordConfig,
}

#[async_trait::async_trait]
impl SeedProvider for DemoUsersSeed {
    fn name(&self) -> &str { "demo_users" }

    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError> {
        let started = Instant::now();

        // Only a completely empty directory gets demo accounts
        if users::Entity::find().count(db).await? > 0 {
            return Ok(SeedResult::success(self.name(), 0, 3, elapsed_ms(started)));
        }

        let password_hash = hash_password(
            &SecretString::from(DEMO_PASSWORD.to_string()),
            Some(self.password_config.clone()),
        )?
        .expose_secret()
        .to_string();

        let account = |email: &str, full_name: &str, role: UserRole, manager_id: Option<i32>| {
            users::ActiveModel {
                email: Set(email.to_string()),
                password_hash: Set(password_hash.clone()),
                full_name: Set(full_name.to_string()),
                role: Set(role),
                manager_id: Set(manager_id),
                is_verified: Set(true),
                verification_token: Set(None),
                verification_token_expires: Set(None),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
        };

        let manager = account("manager@company.com", "John Manager", UserRole::Manager, None)
            .insert(db)
            .await?;

        for (email, full_name) in [
            ("employee1@company.com", "Alice Employee"),
            ("employee2@company.com", "Bob Employee"),
        ] {
            account(email, full_name, UserRole::Employee, Some(manager.id))
                .insert(db)
                .await?;
        }

        Ok(SeedResult::success(self.name(), 3, 0, elapsed_ms(started)))
    }
}

/// The default tag catalog. Existing names are left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTagsSeed;

#[async_trait::async_trait]
impl SeedProvider for DefaultTagsSeed {
    fn name(&self) -> &str { "default_tags" }

    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError> {
        let started = Instant::now();
        let mut inserted = 0;
        let mut skipped = 0;

        for (name, color) in DEFAULT_TAGS {
            let exists = tags::Entity::find()
                .filter(tags::Column::Name.eq(*name))
                .one(db)
                .await?
                .is_some();

            if exists {
                skipped += 1;
                continue;
            }

            tags::ActiveModel {
                name: Set(name.to_string()),
                color: Set(color.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await?;
            inserted += 1;
        }

        Ok(SeedResult::success(
            self.name(),
            inserted,
            skipped,
            elapsed_ms(started),
        ))
    }
}

fn elapsed_ms(started: Instant) -> u64 { u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX) }

/// Runs all registered seed providers
///
/// # Arguments
///
/// * `db` - The database connection
/// * `password_config` - Hashing parameters for the demo accounts
///
/// # Errors
///
/// Returns an error if any seed operation fails.
pub async fn run_all_seeds(
    db: &DatabaseConnection,
    password_config: &PasswordConfig,
) -> Result<Vec<SeedResult>, AppError> {
    let providers: Vec<Box<dyn SeedProvider>> = vec![
        Box::new(DemoUsersSeed {
            password_config: password_config.clone(),
        }),
        Box::new(DefaultTagsSeed),
    ];

    let mut results = Vec::with_capacity(providers.len());
    for provider in providers {
        let result = provider.run(db).await?;
        tracing::info!(
            seed = %result.seed_name,
            inserted = result.inserted_count,
            skipped = result.skipped_count,
            duration_ms = result.duration_ms,
            "Seed applied"
        );
        results.push(result);
    }

    Ok(results)
}
