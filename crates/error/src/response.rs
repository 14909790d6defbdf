//! # Error Responses
//!
//! JSON body rendered for every failed request.
//!
//! ## Response Format
//!
//! ```json
//! {
//!   "status": "error",
//!   "code": "NOT_FOUND",
//!   "message": "Feedback not found"
//! }
//! ```

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::AppError;

/// Error body returned to API clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Always `"error"`.
    pub status:  String,
    /// Machine readable error code.
    pub code:    String,
    /// Human readable message.
    pub message: String,
}

impl ErrorResponse {
    /// Create an error body.
    #[inline]
    pub fn new(code: impl ToString, message: impl ToString) -> Self {
        Self {
            status:  "error".to_string(),
            code:    code.to_string(),
            message: message.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged in full and masked for the client.
        let message = if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
            "Internal server error".to_string()
        }
        else {
            tracing::debug!(code = self.code(), error = %self, "Request rejected");
            self.message()
        };

        let mut response = (status, Json(ErrorResponse::new(self.code(), message))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}
