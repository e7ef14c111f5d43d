//! Bounded transactions.
//!
//! Every engine transaction is bounded twice: PostgreSQL's `lock_timeout` caps each
//! individual row-lock wait, and a tokio timeout caps the work inside the
//! transaction. A transaction dropped by the outer timeout is rolled back by sqlx.
//!
//! COMMIT is never awaited inside [`within`]. A commit whose future is dropped may
//! still take effect on the server, so the bounded block hands the open
//! transaction back and the caller commits after the timeout has been decided.

use sqlx::{PgPool, Postgres, Transaction};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Default cap on a single row-lock wait
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Default cap on a whole transaction
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// The outer transaction timeout elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Database operation timed out after {0:?}")]
pub struct TimedOut(pub Duration);

/// Row lock strength requested by `SELECT ... FOR <mode>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Blocks writers, admits other sharers
    Share,
    /// Exclusive
    Update,
}

impl LockMode {
    pub fn as_sql(self) -> &'static str {
        match self {
            LockMode::Share => "FOR SHARE",
            LockMode::Update => "FOR UPDATE",
        }
    }
}

/// Begin a transaction whose row-lock waits give up after `lock_timeout`.
///
/// The setting is transaction-local and disappears on commit or rollback.
pub async fn begin(
    pool: &PgPool,
    lock_timeout: Duration,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT set_config('lock_timeout', $1, true)")
        .bind(format!("{}ms", lock_timeout.as_millis().max(1)))
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}

/// Run `future` to completion or fail with [`TimedOut`] after `duration`.
///
/// `future` must not commit: a [`TimedOut`] result promises that nothing was
/// written.
///
/// # Example
///
/// ```no_run
/// use igaming::db::timeouts::{within, TimedOut, DEFAULT_TRANSACTION_TIMEOUT};
/// # use sqlx::PgPool;
/// #[derive(Debug)]
/// enum Error { Db(sqlx::Error), Timeout(TimedOut) }
/// impl From<TimedOut> for Error { fn from(e: TimedOut) -> Self { Error::Timeout(e) } }
///
/// # async fn example(pool: &PgPool) -> Result<(), Error> {
/// within(DEFAULT_TRANSACTION_TIMEOUT, async {
///     sqlx::query("SELECT 1").execute(pool).await.map_err(Error::Db)
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn within<F, T, E>(duration: Duration, future: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<TimedOut>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(TimedOut(duration).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Timeout(TimedOut),
        Failed,
    }

    impl From<TimedOut> for TestError {
        fn from(e: TimedOut) -> Self {
            TestError::Timeout(e)
        }
    }

    #[tokio::test]
    async fn test_within_passes_result_through() {
        let ok: Result<u32, TestError> = within(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<u32, TestError> =
            within(Duration::from_secs(1), async { Err(TestError::Failed) }).await;
        assert_eq!(err, Err(TestError::Failed));
    }

    #[tokio::test]
    async fn test_within_times_out() {
        let result: Result<(), TestError> = within(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert_eq!(
            result,
            Err(TestError::Timeout(TimedOut(Duration::from_millis(10))))
        );
    }

    #[test]
    fn test_timeout_error_display() {
        let err = TimedOut(Duration::from_secs(5));
        assert!(err.to_string().contains("timed out"));
        assert!(err.to_string().contains("5s"));
    }

    #[test]
    fn test_lock_mode_sql() {
        assert_eq!(LockMode::Share.as_sql(), "FOR SHARE");
        assert_eq!(LockMode::Update.as_sql(), "FOR UPDATE");
    }
}
