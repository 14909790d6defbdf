//! # Request ID Tracking
//!
//! Request identifiers attached to every HTTP request span.
//! New ids are CUID2 strings; ids supplied by a client through the
//! `x-request-id` header are accepted when they look safe to log.

/// Header used to receive and return request ids.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 64;

/// A request ID type using CUID2.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID using CUID2.
    #[inline]
    pub fn new() -> Self { Self(cuid2::create_id()) }

    /// Accept a client supplied id if it is 8 to 64 URL-safe characters.
    pub fn from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        let valid = (MIN_LEN ..= MAX_LEN).contains(&value.len()) &&
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        valid.then(|| Self(value.to_string()))
    }

    /// Use the header value when valid, otherwise generate a fresh id.
    pub fn from_header_or_new(value: Option<&str>) -> Self { value.and_then(Self::from_header).unwrap_or_default() }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}
