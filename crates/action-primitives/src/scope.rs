//! Cancellable execution scopes
//!
//! Every coordinator derives a child scope from the one it was handed, so
//! cancelling a parent reaches all in-flight children while a child can be
//! cancelled early without touching its parent.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::errors::ActionError;

/// Execution scope for actions
///
/// Carries:
/// - Cancellation token for cooperative, hierarchical cancellation
/// - Optional deadline inherited by every derived scope
#[derive(Clone, Debug, Default)]
pub struct ExecScope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl ExecScope {
    /// Root scope with no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Root scope driven by an externally owned token
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Root scope that expires after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().child_with_timeout(timeout)
    }

    /// Derive a child scope that shares this scope's deadline.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a child scope whose deadline is the earlier of the parent's
    /// and `now + timeout`.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        self.child_with_deadline(Instant::now() + timeout)
    }

    pub fn child_with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel this scope and every scope derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if this scope has been cancelled or has expired
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.is_timeout()
    }

    /// Check if this scope has exceeded its deadline
    pub fn is_timeout(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }

    /// Remaining time until the deadline, if one is set
    pub fn remaining_time(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// The error describing why this scope ended, or `None` while it is live.
    pub fn error(&self) -> Option<ActionError> {
        if self.token.is_cancelled() {
            Some(ActionError::Cancelled)
        } else if self.is_timeout() {
            Some(ActionError::DeadlineExceeded)
        } else {
            None
        }
    }

    /// `Err` with the scope error once the scope has ended.
    pub fn check(&self) -> Result<(), ActionError> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Resolves once the token is cancelled or the deadline passes.
    pub async fn cancelled(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }

    /// Wait for the scope to end and return its error.
    pub async fn done(&self) -> ActionError {
        self.cancelled().await;
        self.error().unwrap_or(ActionError::Cancelled)
    }
}
