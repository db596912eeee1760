//! Request-scoped deadline and cancellation signal handed to providers.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::provider::ProviderError;

/// Deadline and cancellation signal for one rate resolution.
///
/// Cloning a context shares the same signal. [`FetchContext::child`] derives a
/// context that keeps the deadline and is cancelled together with its parent,
/// but can also be cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl FetchContext {
    /// Creates a context with no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Creates a context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            token: CancellationToken::new(),
        }
    }

    /// Derives a child context sharing this context's deadline.
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            token: self.token.child_token(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Broadcasts cancellation to this context and all its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the context is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Completes once the deadline elapses; never completes without one.
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }

    /// Runs `work` until it finishes, the context is cancelled, or the
    /// deadline elapses, whichever comes first.
    ///
    /// Abandoning `work` drops it, which aborts any in-flight request it owns.
    pub async fn race<T, F>(&self, work: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        if self.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        if self.is_expired() {
            return Err(ProviderError::DeadlineExceeded);
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ProviderError::Cancelled),
            _ = self.expired() => Err(ProviderError::DeadlineExceeded),
            result = work => result,
        }
    }
}
