//! # Durable Writes
//!
//! Every mutation runs as a [`UnitOfWork`] inside a session opened from a
//! [`SessionSource`]. When the store reports lock contention the session is
//! rolled back and dropped, and the whole unit is replayed on a fresh session
//! after an exponential backoff plus up to half again of random jitter.
//!
//! ```text
//! attempt 0 -- busy --> rollback, close, sleep 100..150ms
//! attempt 1 -- busy --> rollback, close, sleep 200..300ms
//! attempt 2 -- ok ----> commit
//! ```

use std::time::Duration;

use async_trait::async_trait;
use error::Result;
use rand::Rng;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

/// Opens, commits and rolls back transactional sessions.
#[async_trait]
pub trait SessionSource: Send + Sync {
    type Session: Send + Sync;

    /// Begin a new session. Sessions are never reused across attempts.
    async fn open(&self) -> Result<Self::Session>;

    async fn commit(&self, session: Self::Session) -> Result<()>;

    async fn rollback(&self, session: Self::Session) -> Result<()>;
}

#[async_trait]
impl SessionSource for DatabaseConnection {
    type Session = DatabaseTransaction;

    async fn open(&self) -> Result<DatabaseTransaction> { Ok(self.begin().await?) }

    async fn commit(&self, session: DatabaseTransaction) -> Result<()> { Ok(session.commit().await?) }

    async fn rollback(&self, session: DatabaseTransaction) -> Result<()> { Ok(session.rollback().await?) }
}

/// A replayable piece of work executed against one session.
///
/// Implementations must not keep state between runs: a retried unit sees a
/// brand new session and must read everything it needs again.
#[async_trait]
pub trait UnitOfWork<S: Send + Sync>: Send + Sync {
    type Output: Send;

    async fn run(&self, session: &S) -> Result<Self::Output>;
}

/// Retry budget for transient storage contention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the first retry, doubled for every further retry
    pub base_delay:   Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay:   Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Minimum sleep before retrying after the zero-based `attempt` failed.
    pub fn backoff(&self, attempt: u32) -> Duration { self.base_delay.saturating_mul(2u32.saturating_pow(attempt)) }

    /// [`RetryPolicy::backoff`] plus a random extra of up to half of it.
    pub fn jittered_backoff(&self, attempt: u32) -> Duration {
        let backoff = self.backoff(attempt);
        let spread = u64::try_from(backoff.as_micros() / 2).unwrap_or(u64::MAX);
        backoff.saturating_add(Duration::from_micros(rand::rng().random_range(0 ..= spread)))
    }
}

/// Runs `work` on a fresh session, retrying transient failures.
///
/// # Arguments
///
/// * `source` - Where sessions come from
/// * `policy` - Attempt budget and backoff
/// * `work` - The unit to run
///
/// # Returns
///
/// The output of the first attempt that commits.
///
/// # Errors
///
/// Non-transient errors are returned immediately. Transient errors are
/// returned once the attempt budget is spent.
pub async fn execute_with_retry<Src, W>(source: &Src, policy: &RetryPolicy, work: &W) -> Result<W::Output>
where
    Src: SessionSource + ?Sized,
    W: UnitOfWork<Src::Session> + ?Sized,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match attempt_once(source, work).await {
            Ok(output) => {
                if attempt > 0 {
                    tracing::info!(attempts = attempt + 1, "Write committed after retry");
                }
                return Ok(output);
            },
            Err(err) if err.is_transient() && attempt + 1 < max_attempts => {
                let delay = policy.jittered_backoff(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Storage busy, retrying on a fresh session"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            },
            Err(err) => {
                if err.is_transient() {
                    tracing::error!(attempts = attempt + 1, error = %err, "Storage still busy, giving up");
                }
                return Err(err);
            },
        }
    }
}

/// One open, run, commit-or-rollback cycle. The session is consumed either way.
async fn attempt_once<Src, W>(source: &Src, work: &W) -> Result<W::Output>
where
    Src: SessionSource + ?Sized,
    W: UnitOfWork<Src::Session> + ?Sized,
{
    let session = source.open().await?;

    match work.run(&session).await {
        Ok(output) => {
            source.commit(session).await?;
            Ok(output)
        },
        Err(err) => {
            if let Err(rollback_err) = source.rollback(session).await {
                tracing::warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        },
    }
}
