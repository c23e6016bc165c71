//! Sequential waiting loops: poll-until-done and run-every-interval

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, trace, warn};

use crate::{
    action::Action,
    config::{WaitConfig, DEFAULT_POLL_INTERVAL_MS},
    errors::ActionError,
    outcome::Outcome,
    scope::ExecScope,
};

/// Invoke `probe` once per `tick` until it reports something other than
/// "not yet".
///
/// The scope is checked before every invocation; there is no retry bound,
/// callers limit total time through the scope deadline. Invocations never
/// overlap.
pub async fn wait_until<F, Fut>(
    scope: &ExecScope,
    tick: Duration,
    mut probe: F,
) -> Result<(), ActionError>
where
    F: FnMut(ExecScope) -> Fut,
    Fut: Future<Output = Outcome>,
{
    let mut attempts: u64 = 0;
    loop {
        tokio::select! {
            biased;
            err = scope.done() => {
                debug!(attempts, error = %err, "wait_until stopped by scope");
                return Err(err);
            }
            _ = sleep(tick) => {}
        }

        attempts += 1;
        match probe(scope.clone()).await {
            Outcome::Continue | Outcome::NotMatched => {
                trace!(attempts, "probe not ready");
            }
            outcome => {
                debug!(attempts, ?outcome, "wait_until finished");
                return outcome.into_result();
            }
        }
    }
}

/// Run `action` once per `interval` until it fails or the scope ends.
///
/// The next timer is armed only after the previous run returns.
pub async fn interval_run<A>(
    scope: &ExecScope,
    interval: Duration,
    action: &A,
) -> Result<(), ActionError>
where
    A: Action + ?Sized,
{
    let mut runs: u64 = 0;
    loop {
        tokio::select! {
            biased;
            err = scope.done() => {
                debug!(runs, error = %err, "interval_run stopped by scope");
                return Err(err);
            }
            _ = sleep(interval) => {}
        }

        runs += 1;
        if let Err(err) = action.run(scope).await {
            warn!(runs, error = %err, "interval action failed");
            return Err(err);
        }
    }
}

/// Retry-loop action built from an async probe.
pub struct WaitUntil<F> {
    probe: F,
    tick: Duration,
}

impl<F, Fut> WaitUntil<F>
where
    F: Fn(ExecScope) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    pub fn new(probe: F) -> Self {
        Self {
            probe,
            tick: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_config(self, config: &WaitConfig) -> Self {
        self.with_tick(config.poll_interval())
    }
}

#[async_trait]
impl<F, Fut> Action for WaitUntil<F>
where
    F: Fn(ExecScope) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        wait_until(scope, self.tick, |scope| (self.probe)(scope)).await
    }
}

/// Periodic action wrapper.
pub struct IntervalRun<A> {
    interval: Duration,
    action: A,
}

impl<A> IntervalRun<A>
where
    A: Action,
{
    pub fn new(interval: Duration, action: A) -> Self {
        Self { interval, action }
    }
}

#[async_trait]
impl<A> Action for IntervalRun<A>
where
    A: Action,
{
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        interval_run(scope, self.interval, &self.action).await
    }
}
