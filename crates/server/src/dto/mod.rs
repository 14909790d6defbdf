//! # Data Transfer Objects
//!
//! Request bodies, query strings and response shapes for the HTTP API.

pub mod account;
pub mod dashboard;
pub mod feedback;
pub mod feedback_requests;
pub mod tags;
pub mod users;

use serde::{Deserialize, Serialize};

/// Plain `{"message": ..}` acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status:         String,
    pub database:       String,
    pub uptime_seconds: u64,
}
