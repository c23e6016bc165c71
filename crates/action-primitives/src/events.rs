//! Predicate-driven event waits

use std::sync::Arc;

use soulbrowser_event_bus::{Event, EventSource};
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::{errors::ActionError, outcome::Outcome, scope::ExecScope};

/// Decides whether an event ends a wait.
///
/// `Done` ends the wait successfully, `NotMatched` (or `Continue`) keeps
/// listening, `Failed` ends the wait with that error.
pub type EventPredicate<E> = Arc<dyn Fn(&E) -> Outcome + Send + Sync>;

/// Block until `source` delivers an event accepted by `predicate`, or the
/// scope ends.
///
/// Only events delivered after the listener is registered are considered.
/// The listener runs under a child scope that is cancelled as soon as the
/// wait resolves, either way, or when the returned future is dropped.
pub async fn wait_event<E>(
    scope: &ExecScope,
    source: &dyn EventSource<E>,
    predicate: EventPredicate<E>,
) -> Result<(), ActionError>
where
    E: Event,
{
    let listener = scope.child();
    // Stops the listener even when this future is dropped before resolving.
    let _stop_listener = listener.token().clone().drop_guard();
    let (tx, rx) = oneshot::channel();

    let mut completion = Some(tx);
    let listener_scope = listener.clone();
    source.listen(
        listener.token().clone(),
        Box::new(move |event: E| {
            let outcome = evaluate(&predicate, &event);
            if outcome.is_pending() {
                trace!(?event, "event ignored");
                return;
            }
            // Later matches after the first are dropped here.
            if let Some(tx) = completion.take() {
                listener_scope.cancel();
                let _ = tx.send(outcome.into_result());
            }
        }),
    );
    debug!("listening for matching event");

    let result = tokio::select! {
        biased;
        err = scope.done() => Err(err),
        signalled = rx => signalled.unwrap_or(Err(ActionError::EventStreamClosed)),
    };
    listener.cancel();

    match &result {
        Ok(()) => debug!("matching event observed"),
        Err(err) => debug!(
            error = %err,
            severity = err.severity(),
            retryable = err.is_retryable(),
            "event wait ended without a match"
        ),
    }
    result
}

fn evaluate<E>(predicate: &EventPredicate<E>, event: &E) -> Outcome {
    predicate(event)
}
