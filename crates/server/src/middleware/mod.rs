//! # HTTP Middleware
//!
//! Custom middleware for request processing.

pub mod auth;
pub mod request_log;
