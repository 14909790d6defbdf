//! # User Handlers
//!
//! Account creation by managers and the directory views.

use async_trait::async_trait;
use auth::{
    PasswordConfig,
    VerificationToken,
    generate_verification_token,
    hash_password,
    permissions::{Permission, UserAction},
    secrecy::{ExposeSecret, SecretString},
};
use axum::Json;
use chrono::Utc;
use entity::{sea_orm_active_enums::UserRole, users};
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    dto::users::{CreateUserRequest, UserResponse},
    durable::{UnitOfWork, execute_with_retry},
    middleware::auth::AuthenticatedUser,
    notifications::{self, Notification},
};

/// Hashes on the blocking pool; Argon2 would otherwise stall the runtime.
pub(crate) async fn hash_on_blocking_pool(password: &str, config: &PasswordConfig) -> Result<String> {
    let password = SecretString::from(password.to_string());
    let config = config.clone();

    let hashed = tokio::task::spawn_blocking(move || hash_password(&password, Some(config)))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))??;

    Ok(hashed.expose_secret().to_string())
}

/// Picks the manager a new account reports to.
///
/// # Errors
///
/// `ValidationError` when a manager account is given a manager.
fn resolve_manager_id(actor_id: i32, req: &CreateUserRequest) -> Result<Option<i32>> {
    match req.role {
        UserRole::Manager if req.manager_id.is_some() => Err(AppError::validation("Managers cannot have a manager")),
        UserRole::Manager => Ok(None),
        UserRole::Employee => Ok(Some(req.manager_id.unwrap_or(actor_id))),
    }
}

struct CreateUser<'a> {
    req:           &'a CreateUserRequest,
    manager_id:    Option<i32>,
    password_hash: &'a str,
    verification:  &'a VerificationToken,
}

#[async_trait]
impl UnitOfWork<DatabaseTransaction> for CreateUser<'_> {
    type Output = users::Model;

    async fn run(&self, txn: &DatabaseTransaction) -> Result<users::Model> {
        let taken = users::Entity::find()
            .filter(users::Column::Email.eq(self.req.email.as_str()))
            .one(txn)
            .await?;
        if taken.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        if let Some(manager_id) = self.manager_id {
            users::Entity::find_by_id(manager_id)
                .filter(users::Column::Role.eq(UserRole::Manager))
                .one(txn)
                .await?
                .ok_or_else(|| AppError::not_found("Manager not found"))?;
        }

        let created = users::ActiveModel {
            email: Set(self.req.email.clone()),
            password_hash: Set(self.password_hash.to_string()),
            full_name: Set(self.req.full_name.clone()),
            role: Set(self.req.role),
            manager_id: Set(self.manager_id),
            is_verified: Set(false),
            verification_token: Set(Some(self.verification.token.clone())),
            verification_token_expires: Set(Some(self.verification.expires_at)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Ok(created)
    }
}

/// List every user (requires users:read)
#[with_permission(Permission::Users(UserAction::Read))]
pub async fn list_users_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<Vec<UserResponse>>> {
    let all = users::Entity::find()
        .order_by_asc(users::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(all.iter().map(UserResponse::from).collect()))
}

/// List the caller's direct reports (requires users:team)
#[with_permission(Permission::Users(UserAction::Team))]
pub async fn team_members_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<Vec<UserResponse>>> {
    let team = users::Entity::find()
        .filter(users::Column::ManagerId.eq(user.id))
        .order_by_asc(users::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(team.iter().map(UserResponse::from).collect()))
}

/// List manager accounts (requires users:managers)
#[with_permission(Permission::Users(UserAction::Managers))]
pub async fn managers_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<Vec<UserResponse>>> {
    let managers = users::Entity::find()
        .filter(users::Column::Role.eq(UserRole::Manager))
        .order_by_asc(users::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(managers.iter().map(UserResponse::from).collect()))
}

/// Create an account (requires users:create)
///
/// Employees without an explicit `manager_id` report to the caller. The new
/// account starts unverified; verification and welcome mail go out after
/// the insert commits.
///
/// # Errors
///
/// * `ValidationError` - malformed body, or a manager given a manager
/// * `Conflict` - the email is taken
/// * `NotFound` - `manager_id` does not name a manager
#[with_permission(Permission::Users(UserAction::Create))]
pub async fn create_user_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateUserRequest,
) -> Result<Json<UserResponse>> {
    req.validate()?;
    let manager_id = resolve_manager_id(user.id, &req)?;

    let password_hash = hash_on_blocking_pool(&req.password, &state.password_config).await?;
    let verification = generate_verification_token();

    let created = execute_with_retry(
        &state.writer,
        &state.retry_policy,
        &CreateUser {
            req: &req,
            manager_id,
            password_hash: &password_hash,
            verification: &verification,
        },
    )
    .await?;

    info!(
        user_id = created.id,
        role = %created.role,
        created_by = user.id,
        "User created"
    );

    notifications::dispatch(
        state.mailer.clone(),
        vec![
            Notification::Verification {
                to:        created.email.clone(),
                full_name: created.full_name.clone(),
                token:     verification.token,
            },
            Notification::Welcome {
                to:        created.email.clone(),
                full_name: created.full_name.clone(),
                role:      created.role,
            },
        ],
    );

    Ok(Json(UserResponse::from(&created)))
}
