//! # User Data Transfer Objects
//!
//! Request and response types for user management endpoints.

use chrono::{DateTime, Utc};
use entity::{sea_orm_active_enums::UserRole, users};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id:          i32,
    pub email:       String,
    pub full_name:   String,
    pub role:        UserRole,
    pub manager_id:  Option<i32>,
    pub is_verified: bool,
    pub created_at:  DateTime<Utc>,
}

impl From<&users::Model> for UserResponse {
    fn from(user: &users::Model) -> Self {
        Self {
            id:          user.id,
            email:       user.email.clone(),
            full_name:   user.full_name.clone(),
            role:        user.role,
            manager_id:  user.manager_id,
            is_verified: user.is_verified,
            created_at:  user.created_at,
        }
    }
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self { Self::from(&user) }
}

/// Request to create a new user
#[derive(Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email:      String,
    /// User's password
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password:   String,
    /// User's full name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Full name must be between 1 and 255 characters"
    ))]
    pub full_name:  String,
    pub role:       UserRole,
    /// Manager the new employee reports to, defaults to the caller
    pub manager_id: Option<i32>,
}

// Keeps the password out of logs.
impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("manager_id", &self.manager_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    fn request() -> CreateUserRequest {
        serde_json::from_value(serde_json::json!({
            "email": "new.hire@company.com",
            "password": "password123",
            "full_name": "New Hire",
            "role": "employee"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_user_request_validation() {
        assert!(request().validate().is_ok());

        let mut short = request();
        short.password = "short".to_string();
        assert!(short.validate().is_err());

        let mut bad_email = request();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut blank = request();
        blank.full_name = String::new();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", request());
        assert!(!rendered.contains("password123"));
    }
}
