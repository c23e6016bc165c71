//! Location waits - poll the document location until it moves

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use crate::{
    action::Action,
    config::{WaitConfig, DEFAULT_POLL_INTERVAL_MS},
    driver::PageDriver,
    errors::ActionError,
    outcome::Outcome,
    scope::ExecScope,
    slot::OutputSlot,
    waiting::wait_until,
};

async fn wait_location_not(
    driver: &dyn PageDriver,
    scope: &ExecScope,
    tick: Duration,
    not: &str,
    ret: Option<&OutputSlot<String>>,
) -> Result<(), ActionError> {
    wait_until(scope, tick, |scope| async move {
        match driver.location(&scope).await {
            Ok(url) if url != not => {
                debug!(url = %url, "location changed");
                if let Some(slot) = ret {
                    slot.set(url);
                }
                Outcome::Done
            }
            Ok(_) => Outcome::Continue,
            // A page mid-navigation often cannot answer; try again next tick.
            Err(err) => {
                trace!(error = %err, "location probe failed");
                Outcome::Continue
            }
        }
    })
    .await
}

/// Wait until the document location differs from `not`.
pub struct WaitNotLocation {
    driver: Arc<dyn PageDriver>,
    not: String,
    ret: Option<OutputSlot<String>>,
    tick: Duration,
}

impl WaitNotLocation {
    pub fn new(driver: Arc<dyn PageDriver>, not: impl Into<String>) -> Self {
        Self {
            driver,
            not: not.into(),
            ret: None,
            tick: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Record the new location here once it differs.
    pub fn with_result(mut self, slot: OutputSlot<String>) -> Self {
        self.ret = Some(slot);
        self
    }

    pub fn with_config(mut self, config: &WaitConfig) -> Self {
        self.tick = config.poll_interval();
        self
    }
}

#[async_trait]
impl Action for WaitNotLocation {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        wait_location_not(
            self.driver.as_ref(),
            scope,
            self.tick,
            &self.not,
            self.ret.as_ref(),
        )
        .await
    }
}

/// Wait until the document location differs from what it is right now.
pub struct WaitLocationChanged {
    driver: Arc<dyn PageDriver>,
    ret: Option<OutputSlot<String>>,
    tick: Duration,
}

impl WaitLocationChanged {
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            ret: None,
            tick: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    pub fn with_result(mut self, slot: OutputSlot<String>) -> Self {
        self.ret = Some(slot);
        self
    }

    pub fn with_config(mut self, config: &WaitConfig) -> Self {
        self.tick = config.poll_interval();
        self
    }
}

#[async_trait]
impl Action for WaitLocationChanged {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        let initial = match self.driver.location(scope).await {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, "could not read initial location; waiting for any location");
                String::new()
            }
        };
        debug!(initial = %initial, "waiting for location change");
        wait_location_not(
            self.driver.as_ref(),
            scope,
            self.tick,
            &initial,
            self.ret.as_ref(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn returns_new_location_once_it_moves() {
        let fake = FakePage::new();
        let location = Arc::clone(&fake.location);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(130)).await;
            *location.lock() = "https://example.com/next".to_string();
        });

        let slot = OutputSlot::new();
        WaitLocationChanged::new(fake)
            .with_result(slot.clone())
            .run(&ExecScope::new())
            .await
            .unwrap();
        assert_eq!(slot.get().as_deref(), Some("https://example.com/next"));
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_location_runs_until_deadline() {
        let fake = FakePage::new();
        let slot = OutputSlot::new();
        let scope = ExecScope::with_timeout(Duration::from_millis(200));
        let err = WaitNotLocation::new(fake, "about:blank")
            .with_result(slot.clone())
            .run(&scope)
            .await
            .unwrap_err();
        assert_eq!(err, ActionError::DeadlineExceeded);
        assert!(!slot.is_set());
    }
}
