//! # JWT Token Management
//!
//! HS256 access tokens carrying the user id, email and role.

use std::{
    collections::HashSet,
    fmt,
    time::{Duration, SystemTime},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use cuid2::CuidConstructor;
use entity::sea_orm_active_enums::UserRole;
use error::{AppError, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};

/// Default token lifetime, one day.
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 86_400;

/// Token signing configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Base64 encoded HMAC secret
    pub secret:             String,
    /// Token lifetime in seconds
    pub expiration_seconds: u64,
    /// Expected `iss` claim
    pub issuer:             String,
    /// Expected `aud` claim
    pub audience:           String,
}

impl JwtConfig {
    /// Builds a configuration from a raw secret with default issuer, audience
    /// and lifetime.
    #[must_use]
    pub fn for_secret(raw_secret: &str) -> Self {
        Self {
            secret:             STANDARD.encode(raw_secret),
            expiration_seconds: DEFAULT_EXPIRATION_SECONDS,
            issuer:             "feedback-tracker".to_string(),
            audience:           "feedback-tracker-api".to_string(),
        }
    }

    /// Sets the token lifetime
    #[must_use]
    pub fn with_expiration(mut self, seconds: u64) -> Self {
        self.expiration_seconds = seconds;
        self
    }

    /// Sets the issuer and audience
    #[must_use]
    pub fn with_issuer_and_audience(mut self, issuer: &str, audience: &str) -> Self {
        self.issuer = issuer.to_string();
        self.audience = audience.to_string();
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiration_seconds", &self.expiration_seconds)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    pub email: String,

    /// Role at issue time. Informational only; authorization reloads the user.
    pub role: UserRole,

    /// Token issuer
    pub iss: String,

    /// Token audience
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: u64,

    /// Issued at (Unix timestamp)
    pub iat: u64,

    /// Unique token ID
    pub jti: String,
}

impl Claims {
    /// The numeric user id in `sub`, if it parses.
    pub fn user_id(&self) -> Option<i32> { self.sub.parse().ok() }
}

/// Creates a new JWT access token
///
/// # Arguments
///
/// * `config` - JWT configuration
/// * `user_id` - The user's identifier
/// * `email` - The user's email address
/// * `role` - The user's role
///
/// # Errors
///
/// Returns an error if the secret is not valid base64 or encoding fails.
pub fn create_access_token(config: &JwtConfig, user_id: i32, email: &str, role: UserRole) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| AppError::internal(format!("Failed to get current time: {}", e)))?;

    let issued_at = now.as_secs();
    let expiration = now + Duration::from_secs(config.expiration_seconds);

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
        exp: expiration.as_secs(),
        iat: issued_at,
        jti: CuidConstructor::new().with_length(32).create_id(),
    };

    let key = EncodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?;

    jsonwebtoken::encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))
}

/// Validates a JWT token and returns the claims
///
/// # Errors
///
/// Returns [`AppError::JwtExpired`] for expired tokens,
/// [`AppError::JwtInvalidSignature`] for tokens signed with another key and
/// [`AppError::JwtInvalidToken`] for anything else that fails validation.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = DecodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?;

    let mut validation = Validation::default();
    validation.iss = Some(HashSet::from([config.issuer.clone()]));
    validation.aud = Some(HashSet::from([config.audience.clone()]));
    validation.validate_exp = true;
    validation.leeway = 0;

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::JwtExpired,
                ErrorKind::InvalidSignature => AppError::JwtInvalidSignature,
                _ => {
                    tracing::debug!(error = %e, "Token rejected");
                    AppError::JwtInvalidToken
                },
            }
        })
}

/// Extracts the Bearer token from the Authorization header
///
/// # Returns
///
/// The token string if present, or None if missing/invalid.
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    let token = auth_header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}
