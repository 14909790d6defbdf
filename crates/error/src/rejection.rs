//! # Rejection Handlers
//!
//! Conversions from Axum extractor rejections into API errors, so malformed
//! bodies and query strings share the standard error format.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};

use crate::AppError;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self { AppError::bad_request(friendly_json_message(&rejection.body_text())) }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(format!(
            "Query string deserialization error: {}",
            rejection.body_text()
        ))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self { AppError::bad_request(format!("Invalid path parameter: {}", rejection.body_text())) }
}

/// Shortens serde's "missing field `x` at line 1 column 2" to
/// "Missing required field: x"; other messages pass through.
fn friendly_json_message(error_message: &str) -> String {
    const MARKER: &str = "missing field `";

    if let Some(start) = error_message.find(MARKER) {
        let rest = &error_message[start + MARKER.len() ..];
        if let Some(end) = rest.find('`') {
            return format!("Missing required field: {}", &rest[.. end]);
        }
    }

    error_message.to_string()
}
