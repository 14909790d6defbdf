//! # Account Data Transfer Objects
//!
//! Login, token and email verification payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::users::UserResponse;

/// Request body for user login
#[derive(Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// User's password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API requests
    pub access_token: String,
    /// Always `bearer`
    pub token_type:   String,
    pub user:         UserResponse,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user: UserResponse) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

/// `?token=` on the verification endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: String,
}

/// `?email=` on the resend endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ResendVerificationQuery {
    pub email: String,
}
