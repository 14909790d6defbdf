//! # Logging Macros
//!
//! Convenience macros for structured logging with fixed targets.

/// Log an API request with method, path, status and duration.
///
/// # Example
///
/// ```rust
/// logging::log_api_request!("GET", "/feedback", 200, 12);
/// ```
#[macro_export]
macro_rules! log_api_request {
    ($method:expr, $path:expr, $status:expr, $duration:expr) => {
        $crate::info!(
            target: "api",
            method = %$method,
            path = %$path,
            status = %$status,
            duration_ms = %$duration,
            "API request"
        )
    };
}

/// Log an authentication event.
///
/// `$subject` is whatever identifies the caller at that point, usually a
/// user id or the submitted email.
#[macro_export]
macro_rules! log_auth_event {
    ($event:expr, $subject:expr, $success:expr) => {
        $crate::info!(
            target: "auth",
            event = %$event,
            subject = %$subject,
            success = $success,
            "Authentication event"
        )
    };
}

/// Log a security relevant rejection.
#[macro_export]
macro_rules! log_security_event {
    ($event:expr, $subject:expr, $details:expr) => {
        $crate::warn!(
            target: "security",
            event = %$event,
            subject = %$subject,
            details = %$details,
            "Security event"
        )
    };
}
