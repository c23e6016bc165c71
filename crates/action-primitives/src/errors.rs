//! Error types for action primitives

use thiserror::Error;

/// Terminal errors surfaced by actions and the coordinators that drive them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The enclosing scope was cancelled
    #[error("context cancelled")]
    Cancelled,

    /// The enclosing scope's deadline passed
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Domain failure reported by an action
    #[error("Action failed: {0}")]
    Failed(String),

    /// Remote page communication or protocol error
    #[error("CDP I/O error: {0}")]
    CdpIo(String),

    /// History navigation pointed outside the entry list
    #[error("invalid navigation entry (current index {current}, {len} entries)")]
    InvalidHistoryEntry { current: i64, len: usize },

    /// The event source stopped delivering before the wait resolved
    #[error("event stream closed")]
    EventStreamClosed,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    pub fn failed(message: impl Into<String>) -> Self {
        ActionError::Failed(message.into())
    }

    /// True for errors that come from the scope rather than the action itself.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ActionError::Cancelled | ActionError::DeadlineExceeded)
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, ActionError::CdpIo(_) | ActionError::EventStreamClosed)
    }

    /// Get error severity level (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            ActionError::Internal(_) => 3,
            ActionError::CdpIo(_) | ActionError::EventStreamClosed => 2,
            ActionError::Failed(_) | ActionError::InvalidHistoryEntry { .. } => 1,
            ActionError::Cancelled | ActionError::DeadlineExceeded => 0,
        }
    }
}
