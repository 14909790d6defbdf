//! Email verification tokens.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use rand::{RngCore, rng};

/// How long a freshly issued token stays valid.
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Random bytes per token before encoding.
const TOKEN_BYTES: usize = 32;

/// An issued verification token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub token:      String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool { is_expired(self.expires_at, now) }
}

/// Generates a URL-safe token valid for [`VERIFICATION_TOKEN_TTL_HOURS`].
pub fn generate_verification_token() -> VerificationToken {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng().fill_bytes(&mut bytes);

    VerificationToken {
        token:      URL_SAFE_NO_PAD.encode(bytes),
        expires_at: Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS),
    }
}

/// A token expiring exactly at `now` is already expired.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool { expires_at <= now }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_url_safe_and_unique() {
        let first = generate_verification_token();
        let second = generate_verification_token();

        assert_ne!(first.token, second.token);
        assert_eq!(first.token.len(), 43);
        assert!(
            first
                .token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_expiry_window() {
        let issued = generate_verification_token();
        let now = Utc::now();

        assert!(!issued.is_expired(now));
        assert!(!issued.is_expired(now + Duration::hours(23)));
        assert!(issued.is_expired(now + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS) + Duration::seconds(1)));
        assert!(is_expired(now, now));
    }
}
