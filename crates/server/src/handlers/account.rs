//! # Account Handlers
//!
//! Login, current user lookup and email verification.
//!
//! Login and verification are reachable without a token; `me` sits behind
//! the auth middleware like every other protected route.

use async_trait::async_trait;
use auth::{
    VerificationToken,
    create_access_token,
    generate_verification_token,
    secrecy::SecretString,
    verification,
    verify_password,
};
use axum::Json;
use chrono::Utc;
use entity::users;
use error::{AppError, Result};
use logging::log_auth_event;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set};
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    dto::{
        MessageResponse,
        account::{LoginRequest, ResendVerificationQuery, TokenResponse, VerifyEmailQuery},
        users::UserResponse,
    },
    durable::{UnitOfWork, execute_with_retry},
    middleware::auth::AuthenticatedUser,
    notifications::{self, Notification},
};

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Checks the password on the blocking pool.
async fn password_matches(password: &str, password_hash: &str) -> Result<bool> {
    let password = SecretString::from(password.to_string());
    let password_hash = password_hash.to_string();

    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))?;

    Ok(verified.is_ok())
}

/// Exchange email and password for an access token
///
/// # Errors
///
/// `Unauthorized` with one fixed message whether the email is unknown or
/// the password is wrong.
pub async fn login_handler(state: &AppState, req: LoginRequest) -> Result<Json<TokenResponse>> {
    req.validate()?;

    let found = users::Entity::find()
        .filter(users::Column::Email.eq(req.email.as_str()))
        .one(&state.db)
        .await?;

    let expected_hash = match &found {
        Some(user) => user.password_hash.as_str(),
        None => state.login_decoy_hash().await?,
    };
    let matched = password_matches(&req.password, expected_hash).await?;

    let user = match found {
        Some(user) if matched => user,
        _ => {
            log_auth_event!("login", req.email, false);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        },
    };

    let access_token = create_access_token(&state.jwt_config, user.id, &user.email, user.role)?;
    log_auth_event!("login", user.email, true);

    Ok(Json(TokenResponse::bearer(
        access_token,
        UserResponse::from(&user),
    )))
}

/// Current user profile
pub async fn me_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<UserResponse>> {
    let current = users::Entity::find_by_id(user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(&current)))
}

/// Consumes a verification token.
struct VerifyEmail<'a> {
    token: &'a str,
}

#[async_trait]
impl UnitOfWork<DatabaseTransaction> for VerifyEmail<'_> {
    type Output = users::Model;

    async fn run(&self, txn: &DatabaseTransaction) -> Result<users::Model> {
        let invalid = || AppError::validation("Invalid or expired verification token");

        let user = users::Entity::find()
            .filter(users::Column::VerificationToken.eq(self.token))
            .one(txn)
            .await?
            .ok_or_else(invalid)?;

        match user.verification_token_expires {
            Some(expires_at) if !verification::is_expired(expires_at, Utc::now()) => {},
            _ => return Err(invalid()),
        }

        let mut active: users::ActiveModel = user.into();
        active.is_verified = Set(true);
        active.verification_token = Set(None);
        active.verification_token_expires = Set(None);

        Ok(active.update(txn).await?)
    }
}

/// Mark an account verified
///
/// # Errors
///
/// `ValidationError` when the token is unknown, already used or expired.
pub async fn verify_email_handler(state: &AppState, query: VerifyEmailQuery) -> Result<Json<MessageResponse>> {
    let verified = execute_with_retry(
        &state.writer,
        &state.retry_policy,
        &VerifyEmail {
            token: &query.token,
        },
    )
    .await?;

    log_auth_event!("verify_email", verified.email, true);

    Ok(Json(MessageResponse::new("Email verified successfully")))
}

/// Replaces the verification token of an unverified account.
struct ReissueVerification<'a> {
    email:        &'a str,
    verification: &'a VerificationToken,
}

#[async_trait]
impl UnitOfWork<DatabaseTransaction> for ReissueVerification<'_> {
    type Output = users::Model;

    async fn run(&self, txn: &DatabaseTransaction) -> Result<users::Model> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(self.email))
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if user.is_verified {
            return Err(AppError::validation("Email already verified"));
        }

        let mut active: users::ActiveModel = user.into();
        active.verification_token = Set(Some(self.verification.token.clone()));
        active.verification_token_expires = Set(Some(self.verification.expires_at));

        Ok(active.update(txn).await?)
    }
}

/// Issue a fresh verification token and mail it
///
/// The previous token stops working. Mail delivery failures are logged and
/// do not fail the request.
pub async fn resend_verification_handler(
    state: &AppState,
    query: ResendVerificationQuery,
) -> Result<Json<MessageResponse>> {
    let verification = generate_verification_token();

    let user = execute_with_retry(
        &state.writer,
        &state.retry_policy,
        &ReissueVerification {
            email:        &query.email,
            verification: &verification,
        },
    )
    .await?;

    info!(user_id = user.id, "Verification token reissued");

    notifications::dispatch(
        state.mailer.clone(),
        vec![Notification::Verification {
            to:        user.email,
            full_name: user.full_name,
            token:     verification.token,
        }],
    );

    Ok(Json(MessageResponse::new(
        "Verification email sent successfully",
    )))
}
