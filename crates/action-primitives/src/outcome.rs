//! Tagged probe outcomes
//!
//! Retry predicates and event predicates report through [`Outcome`] rather
//! than through marker errors, so "not yet" and "irrelevant" can never be
//! confused with a real failure once they cross a crate boundary.

use crate::errors::ActionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The probe succeeded; stop waiting.
    Done,
    /// Not done yet and not failed; poll again on the next tick.
    Continue,
    /// The observed event is irrelevant; keep listening.
    NotMatched,
    /// Terminal failure; stop and surface the error.
    Failed(ActionError),
}

impl Outcome {
    /// Whether a waiter should keep going.
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Continue | Outcome::NotMatched)
    }

    /// Collapse a terminal outcome into a result.
    ///
    /// Pending markers have no meaning outside the loop that produced them;
    /// reaching this with one is a bug in the caller.
    pub fn into_result(self) -> Result<(), ActionError> {
        match self {
            Outcome::Done => Ok(()),
            Outcome::Failed(err) => Err(err),
            Outcome::Continue | Outcome::NotMatched => Err(ActionError::Internal(
                "pending outcome escaped its wait loop".to_string(),
            )),
        }
    }
}

impl From<Result<(), ActionError>> for Outcome {
    fn from(result: Result<(), ActionError>) -> Self {
        match result {
            Ok(()) => Outcome::Done,
            Err(err) => Outcome::Failed(err),
        }
    }
}

impl From<ActionError> for Outcome {
    fn from(err: ActionError) -> Self {
        Outcome::Failed(err)
    }
}
