//! The action abstraction
//!
//! Coordinators only ever see an action through [`Action::run`]; what an
//! action does with the remote page is its own business.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{errors::ActionError, scope::ExecScope};

/// A unit of cancellable, potentially failing work.
///
/// Cancellation is advisory: implementations are expected to watch `scope`
/// themselves and return its error promptly once it ends.
#[async_trait]
pub trait Action: Send + Sync {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError>;
}

/// Shareable action handle, as taken by the race coordinator.
pub type SharedAction = Arc<dyn Action>;

pub fn shared<A>(action: A) -> SharedAction
where
    A: Action + 'static,
{
    Arc::new(action)
}

#[async_trait]
impl<A> Action for Arc<A>
where
    A: Action + ?Sized,
{
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        (**self).run(scope).await
    }
}

#[async_trait]
impl<A> Action for Box<A>
where
    A: Action + ?Sized,
{
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        (**self).run(scope).await
    }
}

/// Adapter turning an async closure into an [`Action`].
pub struct ActionFn<F>(F);

pub fn action_fn<F, Fut>(f: F) -> ActionFn<F>
where
    F: Fn(ExecScope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    ActionFn(f)
}

#[async_trait]
impl<F, Fut> Action for ActionFn<F>
where
    F: Fn(ExecScope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        (self.0)(scope.clone()).await
    }
}

/// Completes after a fixed duration, or fails early with the scope error.
#[derive(Clone, Copy, Debug)]
pub struct Sleep(pub Duration);

#[async_trait]
impl Action for Sleep {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        tokio::select! {
            err = scope.done() => Err(err),
            _ = tokio::time::sleep(self.0) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_action_receives_scope() {
        let action = action_fn(|scope: ExecScope| async move { scope.check() });
        let scope = ExecScope::new();
        assert!(action.run(&scope).await.is_ok());

        scope.cancel();
        assert_eq!(action.run(&scope).await, Err(ActionError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_is_cut_short_by_cancellation() {
        let scope = ExecScope::with_timeout(Duration::from_millis(20));
        let err = Sleep(Duration::from_secs(5)).run(&scope).await.unwrap_err();
        assert_eq!(err, ActionError::DeadlineExceeded);

        let scope = ExecScope::new();
        assert!(shared(Sleep(Duration::from_millis(5))).run(&scope).await.is_ok());
    }
}
