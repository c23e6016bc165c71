//! First-of-N race coordinator

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::{
    action::{Action, SharedAction},
    errors::ActionError,
    scope::ExecScope,
    slot::OutputSlot,
};

type Delivery = (usize, Result<(), ActionError>);

/// Run every action concurrently and resolve to the first one that finishes.
///
/// All racers share one child scope. The first delivered outcome wins: the
/// child scope is cancelled, and every racer is joined before this returns,
/// so nothing outlives the call. A racer that ignores its scope therefore
/// delays the return until it finishes on its own.
///
/// Returns the winner's index on success, the winner's error if it failed,
/// or the parent scope's error if that ends first.
///
/// # Panics
///
/// Panics if `actions` is empty.
pub async fn wait_one_of(
    scope: &ExecScope,
    actions: &[SharedAction],
) -> Result<usize, ActionError> {
    assert!(!actions.is_empty(), "actions cannot be empty");

    let race = scope.child();
    // Losers are told to stop even if this future is dropped mid-race.
    let _stop_losers = race.token().clone().drop_guard();

    let (tx, mut rx) = mpsc::channel::<Delivery>(1);
    let mut racers = JoinSet::new();
    for (idx, action) in actions.iter().enumerate() {
        racers.spawn(run_racer(idx, Arc::clone(action), race.clone(), tx.clone()));
    }
    drop(tx);
    debug!(racers = actions.len(), "race started");

    let first = tokio::select! {
        biased;
        err = scope.done() => Err(err),
        delivered = rx.recv() => Ok(delivered),
    };

    race.cancel();
    while let Some(joined) = racers.join_next().await {
        if let Err(err) = joined {
            warn!(error = %err, "racer task did not finish cleanly");
        }
    }

    match first {
        Err(err) => {
            debug!(error = %err, "race abandoned by parent scope");
            Err(err)
        }
        Ok(Some((idx, Ok(())))) => {
            debug!(winner = idx, "race won");
            Ok(idx)
        }
        Ok(Some((idx, Err(err)))) => {
            debug!(
                winner = idx,
                error = %err,
                severity = err.severity(),
                retryable = err.is_retryable(),
                "race won by failing action"
            );
            Err(err)
        }
        Ok(None) => Err(ActionError::Internal(
            "every racer exited without reporting an outcome".to_string(),
        )),
    }
}

async fn run_racer(
    idx: usize,
    action: SharedAction,
    race: ExecScope,
    tx: mpsc::Sender<Delivery>,
) {
    let result = action.run(&race).await;
    // Once the race is decided nobody reads the channel again; give up the
    // handoff instead of parking on it.
    tokio::select! {
        biased;
        _ = race.cancelled() => {}
        _ = tx.send((idx, result)) => {}
    }
}

/// Race action: runs its actions with [`wait_one_of`] and records the
/// winner's position in an optional slot.
pub struct WaitOneOf {
    actions: Vec<SharedAction>,
    winner: Option<OutputSlot<usize>>,
}

impl WaitOneOf {
    /// # Panics
    ///
    /// Panics if `actions` is empty.
    pub fn new(actions: Vec<SharedAction>) -> Self {
        assert!(!actions.is_empty(), "actions cannot be empty");
        Self {
            actions,
            winner: None,
        }
    }

    /// Write the winning index here on success. Left untouched on failure.
    pub fn with_winner(mut self, slot: OutputSlot<usize>) -> Self {
        self.winner = Some(slot);
        self
    }
}

#[async_trait]
impl Action for WaitOneOf {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        let idx = wait_one_of(scope, &self.actions).await?;
        if let Some(slot) = &self.winner {
            slot.set(idx);
        }
        Ok(())
    }
}
