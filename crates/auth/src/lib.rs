//! # Authentication Service
//!
//! Authentication and authorization building blocks:
//! - JWT access tokens
//! - Argon2id password hashing
//! - Role-gated permissions
//! - Email verification tokens

pub mod jwt;
pub mod password;
pub mod permissions;
pub mod verification;

// Re-export commonly used types
pub use jwt::{Claims, JwtConfig, create_access_token, extract_bearer_token, validate_token};
pub use password::{PasswordConfig, PasswordError, hash_password, verify_password};
pub use permissions::{DashboardAction, FeedbackAction, FeedbackRequestAction, Permission, TagAction, UserAction};
pub use secrecy;
pub use verification::{VERIFICATION_TOKEN_TTL_HOURS, VerificationToken, generate_verification_token};
