//! # Authentication Middleware
//!
//! Resolves the bearer token on protected routes into an
//! [`AuthenticatedUser`]. The user is reloaded from the store on every
//! request, so role changes and deletions take effect immediately.

use ::auth::{extract_bearer_token, validate_token};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use entity::{sea_orm_active_enums::UserRole, users};
use error::{AppError, Result};
use logging::log_security_event;
use sea_orm::EntityTrait;

use crate::AppState;

/// The caller of a protected route, as currently stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User ID
    pub id:    i32,
    /// User email
    pub email: String,
    /// Role loaded from the store, never from the token
    pub role:  UserRole,
}

impl From<&users::Model> for AuthenticatedUser {
    fn from(user: &users::Model) -> Self {
        Self {
            id:    user.id,
            email: user.email.clone(),
            role:  user.role,
        }
    }
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates signature, expiry, issuer and audience
/// 3. Loads the token's subject from the database
/// 4. Adds the user to request extensions
///
/// Any failure short-circuits with a 401.
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let authenticated = authenticate(&state, request.headers()).await;

    match authenticated {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        },
        Err(err) => {
            log_security_event!("authentication_rejected", request.uri().path(), err.code());
            err.into_response()
        },
    }
}

/// Resolves the `Authorization` header to a stored user.
///
/// # Errors
///
/// Returns an unauthorized error when the header is missing or malformed,
/// the token fails validation or its subject no longer exists.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedUser> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid authorization header encoding"))?;

    let token =
        extract_bearer_token(auth_header).ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

    let claims = validate_token(&state.jwt_config, &token)?;
    let user_id = claims.user_id().ok_or(AppError::JwtInvalidToken)?;

    let user = users::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized("User not found"))?;

    Ok(AuthenticatedUser::from(&user))
}
