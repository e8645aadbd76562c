//! Cancellation and deadlines for token client operations.

use crate::TokenError;
use std::{future::Future, time::Duration};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Cancellation scope threaded through every [`TokenClient`](crate::TokenClient)
/// operation.
///
/// When the token fires or the deadline passes, the in-flight round trip is
/// dropped and the operation returns [`TokenError::Cancelled`]. A write that
/// was already handed to the node may still be mined.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context cancelled together with `token`.
    pub const fn with_cancel(token: CancellationToken) -> Self {
        Self {
            cancel: token,
            deadline: None,
        }
    }

    /// Set an absolute deadline.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline `timeout` from now.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.deadline(Instant::now() + timeout)
    }

    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// True once the token fired or the deadline passed.
    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Drive `fut` to completion unless this context ends first.
    pub(crate) async fn run<T, F>(&self, op: &str, fut: F) -> Result<T, TokenError>
    where
        F: Future<Output = Result<T, TokenError>>,
    {
        if self.is_done() {
            warn!("{} cancelled before it started", op);
            return Err(TokenError::Cancelled);
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("{} exceeded its deadline", op);
                        Err(TokenError::Cancelled)
                    }
                },
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!("{} cancelled", op);
                Err(TokenError::Cancelled)
            }
            result = bounded => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn slow() -> Result<u32, TokenError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(1)
    }

    #[tokio::test]
    async fn test_background_runs_to_completion() {
        let ctx = CallContext::background();
        let result = ctx.run("op", async { Ok::<_, TokenError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let ctx = CallContext::background();
        let result: Result<(), _> = ctx
            .run("op", async { Err(TokenError::Call("reverted".into())) })
            .await;
        assert!(matches!(result, Err(TokenError::Call(msg)) if msg == "reverted"));
    }

    #[tokio::test]
    async fn test_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = CallContext::with_cancel(token);

        assert!(ctx.is_done());
        let result = ctx.run("op", slow()).await;
        assert!(matches!(result, Err(TokenError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_in_flight() {
        let token = CancellationToken::new();
        let ctx = CallContext::with_cancel(token.clone());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = ctx.run("op", slow()).await;
        assert!(matches!(result, Err(TokenError::Cancelled)));
    }

    #[tokio::test]
    async fn test_deadline_elapses() {
        let ctx = CallContext::background().timeout(Duration::from_millis(20));

        let result = ctx.run("op", slow()).await;
        assert!(matches!(result, Err(TokenError::Cancelled)));
    }

    #[tokio::test]
    async fn test_deadline_not_reached() {
        let ctx = CallContext::background().timeout(Duration::from_secs(30));

        let result = ctx.run("op", async { Ok::<_, TokenError>("done") }).await;
        assert_eq!(result.unwrap(), "done");
        assert!(!ctx.is_done());
    }
}
