//! # Error Traits
//!
//! Extension methods for results carrying convertible errors.

use crate::{AppError, Result};

/// Extension methods for Result types.
pub trait ResultExt<T> {
    /// Convert the error into [`AppError`] and prefix it with `context`.
    fn context<C: ToString>(self, context: C) -> Result<T>;

    /// Convert the error into [`AppError`] and log it at error level.
    fn log_error(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }

    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, "Error occurred");
            err
        })
    }
}
