//! Request-scoped cancellation and deadline for read-model calls.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::errors::AppError;

/// Cancellation signal and deadline attached to one logical request.
///
/// Cloning shares the same token, so cancelling any clone abandons every call
/// running under it.
#[derive(Debug, Clone)]
pub struct QueryContext {
    cancel: CancellationToken,
    timeout: Duration,
}

impl QueryContext {
    pub fn new(cancel: CancellationToken, timeout: Duration) -> Self {
        Self { cancel, timeout }
    }

    /// Context with a fresh token, for callers that only need the deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(CancellationToken::new(), timeout)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `work` until it finishes, the token fires, or the deadline passes.
    ///
    /// On cancellation or timeout the future is dropped, which abandons any
    /// query it has in flight, and the call fails with [`AppError::Cancelled`].
    pub async fn run<T, F>(&self, work: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!("Read-model call cancelled by caller");
                Err(AppError::Cancelled)
            }
            outcome = tokio::time::timeout(self.timeout, work) => match outcome {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "Read-model call exceeded deadline");
                    Err(AppError::Cancelled)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_when_work_finishes() {
        let ctx = QueryContext::with_timeout(Duration::from_secs(5));
        let value = ctx.run(async { Ok::<_, AppError>(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn propagates_work_errors() {
        let ctx = QueryContext::with_timeout(Duration::from_secs(5));
        let err = ctx
            .run(async { Err::<(), _>(AppError::NotFound("user".into())) })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn already_cancelled_token_fails_fast() {
        let ctx = QueryContext::with_timeout(Duration::from_secs(5));
        ctx.token().cancel();
        let err = ctx.run(async { Ok::<_, AppError>(1) }).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn cancellation_abandons_pending_work() {
        let token = CancellationToken::new();
        let ctx = QueryContext::new(token.clone(), Duration::from_secs(30));
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });
        let err = ctx
            .run(std::future::pending::<Result<(), AppError>>())
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn deadline_maps_to_cancelled() {
        let ctx = QueryContext::with_timeout(Duration::from_millis(10));
        let err = ctx
            .run(std::future::pending::<Result<(), AppError>>())
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
