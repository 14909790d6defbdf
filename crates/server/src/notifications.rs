//! # Email Notifications
//!
//! Outgoing mail goes through the [`Mailer`] trait. Delivery is always best
//! effort: messages are dispatched on the runtime after the write that
//! triggered them has committed, and failures are only logged.

use std::sync::Arc;

use async_trait::async_trait;
use entity::sea_orm_active_enums::UserRole;
use thiserror::Error;

/// Errors raised by a mail transport.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail transport unavailable: {0}")]
    Unavailable(String),

    #[error("Delivery rejected for {recipient}: {reason}")]
    Rejected {
        recipient: String,
        reason:    String,
    },
}

/// A message to a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Link the recipient follows to verify their address
    Verification {
        to:        String,
        full_name: String,
        token:     String,
    },
    /// Greeting for a newly created account
    Welcome {
        to:        String,
        full_name: String,
        role:      UserRole,
    },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::Verification {
                to, ..
            }
            | Notification::Welcome {
                to, ..
            } => to,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Verification {
                ..
            } => "verification",
            Notification::Welcome {
                ..
            } => "welcome",
        }
    }
}

/// Mail transport.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    async fn send(&self, notification: &Notification) -> Result<(), MailError>;
}

/// Writes a summary of each message to the log instead of sending it.
#[derive(Debug, Clone)]
pub struct LogMailer {
    /// Base URL of the web client, used to build verification links
    pub app_url: String,
}

impl Default for LogMailer {
    fn default() -> Self {
        Self {
            app_url: "http://localhost:3000".to_string(),
        }
    }
}

impl LogMailer {
    #[must_use]
    pub fn new(app_url: &str) -> Self {
        Self {
            app_url: app_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn verification_link(&self, token: &str) -> String { format!("{}/verify-email?token={}", self.app_url, token) }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        match notification {
            Notification::Verification {
                to,
                full_name,
                token,
            } => {
                tracing::info!(to = %to, full_name = %full_name, "Verification email");
                tracing::debug!(to = %to, link = %self.verification_link(token), "Verification link");
            },
            Notification::Welcome {
                to,
                full_name,
                role,
            } => {
                tracing::info!(to = %to, full_name = %full_name, role = %role, "Welcome email");
            },
        }
        Ok(())
    }
}

/// Sends `notifications` in order on a background task.
///
/// The returned handle only matters to tests; callers normally drop it.
pub fn dispatch(mailer: Arc<dyn Mailer>, notifications: Vec<Notification>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        for notification in notifications {
            match mailer.send(&notification).await {
                Ok(()) => {
                    tracing::debug!(kind = notification.kind(), to = %notification.recipient(), "Email sent")
                },
                Err(e) => {
                    tracing::warn!(
                        kind = notification.kind(),
                        to = %notification.recipient(),
                        error = %e,
                        "Email delivery failed"
                    )
                },
            }
        }
    })
}
