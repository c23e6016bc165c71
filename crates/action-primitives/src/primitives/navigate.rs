//! Navigation primitives - trigger a navigation, then wait for the page event

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use soulbrowser_core_types::PageEvent;
use soulbrowser_event_bus::EventSource;
use tracing::{debug, info};

use crate::{
    action::Action,
    config::{NavWait, WaitConfig},
    driver::PageDriver,
    errors::ActionError,
    events::{wait_event, EventPredicate},
    outcome::Outcome,
    scope::ExecScope,
};

/// Event wait applied after a navigation command.
///
/// Defaults to waiting for the page load event.
#[derive(Clone)]
pub struct NavigateOptions {
    wait: Option<EventPredicate<PageEvent>>,
    label: &'static str,
}

impl NavigateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &WaitConfig) -> Self {
        match config.nav_wait {
            NavWait::LoadEventFired => Self::new().wait_load_event_fired(),
            NavWait::FrameNavigated => Self::new().wait_frame_navigated(),
            NavWait::None => Self::new().no_wait(),
        }
    }

    /// Return as soon as the command is accepted.
    pub fn no_wait(mut self) -> Self {
        self.wait = None;
        self.label = "none";
        self
    }

    pub fn wait_load_event_fired(mut self) -> Self {
        self.wait = Some(Arc::new(load_event_fired));
        self.label = "load_event_fired";
        self
    }

    pub fn wait_frame_navigated(mut self) -> Self {
        self.wait = Some(Arc::new(frame_navigated));
        self.label = "frame_navigated";
        self
    }

    /// Wait with a custom predicate.
    pub fn wait_with<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PageEvent) -> Outcome + Send + Sync + 'static,
    {
        self.wait = Some(Arc::new(predicate));
        self.label = "custom";
        self
    }

    pub fn waits(&self) -> bool {
        self.wait.is_some()
    }
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            wait: None,
            label: "none",
        }
        .wait_load_event_fired()
    }
}

impl fmt::Debug for NavigateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigateOptions")
            .field("wait", &self.label)
            .finish()
    }
}

fn load_event_fired(event: &PageEvent) -> Outcome {
    match event {
        PageEvent::LoadEventFired { .. } => Outcome::Done,
        _ => Outcome::NotMatched,
    }
}

fn frame_navigated(event: &PageEvent) -> Outcome {
    match event {
        PageEvent::FrameNavigated { .. } => Outcome::Done,
        _ => Outcome::NotMatched,
    }
}

/// Block until the page emits the event selected by `options`.
///
/// The listener is registered after the caller has already issued the
/// triggering command, so an event fired in between is missed and the wait
/// then lasts until the scope ends. Registering first is not an option:
/// it can match a load left over from an earlier navigation, and page
/// events carry nothing that ties them to the command that caused them.
/// Callers bound the wait with a scope deadline.
pub async fn wait_nav_event(
    scope: &ExecScope,
    events: &dyn EventSource<PageEvent>,
    options: &NavigateOptions,
) -> Result<(), ActionError> {
    let Some(predicate) = options.wait.clone() else {
        debug!("navigation wait disabled");
        return Ok(());
    };
    debug!(wait = options.label, "waiting for navigation event");
    wait_event(scope, events, predicate).await
}

/// Navigate the current frame to `url`.
pub struct Navigate {
    driver: Arc<dyn PageDriver>,
    url: String,
    options: NavigateOptions,
}

impl Navigate {
    pub fn new(driver: Arc<dyn PageDriver>, url: impl Into<String>) -> Self {
        Self {
            driver,
            url: url.into(),
            options: NavigateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NavigateOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl Action for Navigate {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        info!(url = %self.url, options = ?self.options, "navigating");
        self.driver.navigate(scope, &self.url).await?;
        wait_nav_event(scope, self.driver.events(), &self.options).await
    }
}

/// Wait for a navigation triggered by something else (a click, a script).
pub struct WaitNavigate {
    driver: Arc<dyn PageDriver>,
    options: NavigateOptions,
}

impl WaitNavigate {
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            options: NavigateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NavigateOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl Action for WaitNavigate {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        wait_nav_event(scope, self.driver.events(), &self.options).await
    }
}

/// Navigate to a specific session history entry.
pub struct NavigateToHistoryEntry {
    driver: Arc<dyn PageDriver>,
    entry_id: i64,
    options: NavigateOptions,
}

impl NavigateToHistoryEntry {
    pub fn new(driver: Arc<dyn PageDriver>, entry_id: i64) -> Self {
        Self {
            driver,
            entry_id,
            options: NavigateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NavigateOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl Action for NavigateToHistoryEntry {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        self.driver
            .navigate_to_history_entry(scope, self.entry_id)
            .await?;
        wait_nav_event(scope, self.driver.events(), &self.options).await
    }
}

/// Move through session history by one entry.
pub struct NavigateHistoryStep {
    driver: Arc<dyn PageDriver>,
    step: i64,
    options: NavigateOptions,
}

impl NavigateHistoryStep {
    /// Navigate the current frame backwards in its history.
    pub fn back(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            step: -1,
            options: NavigateOptions::default(),
        }
    }

    /// Navigate the current frame forwards in its history.
    pub fn forward(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            step: 1,
            options: NavigateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NavigateOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl Action for NavigateHistoryStep {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        let history = self.driver.navigation_history(scope).await?;
        let entry_id = history.relative_entry(self.step)?;
        debug!(step = self.step, entry_id, "moving through history");
        self.driver.navigate_to_history_entry(scope, entry_id).await?;
        wait_nav_event(scope, self.driver.events(), &self.options).await
    }
}

/// Reload the current page.
pub struct Reload {
    driver: Arc<dyn PageDriver>,
    options: NavigateOptions,
}

impl Reload {
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            options: NavigateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NavigateOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl Action for Reload {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        self.driver.reload(scope).await?;
        wait_nav_event(scope, self.driver.events(), &self.options).await
    }
}

/// Stop all navigation and pending resource retrieval.
pub struct Stop {
    driver: Arc<dyn PageDriver>,
}

impl Stop {
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self { driver }
    }
}

#[async_trait]
impl Action for Stop {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        self.driver.stop_loading(scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;
    use soulbrowser_core_types::{FrameId, PageId};
    use std::time::Duration;

    #[test]
    fn options_from_config() {
        let mut config = WaitConfig::default();
        assert!(NavigateOptions::from_config(&config).waits());

        config.nav_wait = NavWait::None;
        assert!(!NavigateOptions::from_config(&config).waits());
        assert_eq!(
            format!("{:?}", NavigateOptions::new().wait_frame_navigated()),
            "NavigateOptions { wait: \"frame_navigated\" }"
        );
    }

    #[test]
    fn builtin_predicates() {
        let page = PageId::new();
        let load = PageEvent::LoadEventFired {
            page: page.clone(),
            ts: 0,
        };
        let started = PageEvent::FrameStartedLoading {
            page,
            frame: FrameId::new(),
        };
        assert_eq!(load_event_fired(&load), Outcome::Done);
        assert_eq!(load_event_fired(&started), Outcome::NotMatched);
        assert_eq!(frame_navigated(&load), Outcome::NotMatched);
    }

    #[tokio::test]
    async fn navigate_waits_for_load_event() {
        let fake = FakePage::new();
        let scope = ExecScope::with_timeout(Duration::from_secs(2));
        Navigate::new(fake.clone(), "https://example.com/a")
            .run(&scope)
            .await
            .unwrap();
        assert_eq!(*fake.location.lock(), "https://example.com/a");
    }

    #[tokio::test]
    async fn no_wait_returns_without_subscribing() {
        let fake = FakePage::new();
        Navigate::new(fake.clone(), "https://example.com/b")
            .with_options(NavigateOptions::new().no_wait())
            .run(&ExecScope::new())
            .await
            .unwrap();
        assert_eq!(fake.bus.subscriber_count(), 0);
        assert_eq!(fake.commands(), vec!["navigate https://example.com/b"]);
    }

    #[tokio::test]
    async fn back_at_first_entry_is_invalid() {
        let fake = FakePage::with_history(&["https://a.test", "https://b.test"], 0);
        let err = NavigateHistoryStep::back(fake.clone())
            .run(&ExecScope::new())
            .await
            .unwrap_err();
        assert_eq!(err, ActionError::InvalidHistoryEntry { current: 0, len: 2 });
        assert!(fake.commands().is_empty());
    }

    #[tokio::test]
    async fn forward_moves_to_next_entry() {
        let fake = FakePage::with_history(&["https://a.test", "https://b.test"], 0);
        let scope = ExecScope::with_timeout(Duration::from_secs(2));
        NavigateHistoryStep::forward(fake.clone())
            .with_options(NavigateOptions::new().wait_frame_navigated())
            .run(&scope)
            .await
            .unwrap();
        assert_eq!(fake.commands(), vec!["history 101"]);
    }

    #[tokio::test]
    async fn reload_and_stop_issue_commands() {
        let fake = FakePage::new();
        let scope = ExecScope::with_timeout(Duration::from_secs(2));
        Reload::new(fake.clone()).run(&scope).await.unwrap();
        Stop::new(fake.clone()).run(&scope).await.unwrap();
        assert_eq!(fake.commands(), vec!["reload", "stop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_navigate_times_out_without_events() {
        let fake = FakePage::new();
        let scope = ExecScope::with_timeout(Duration::from_millis(100));
        let err = WaitNavigate::new(fake).run(&scope).await.unwrap_err();
        assert_eq!(err, ActionError::DeadlineExceeded);
    }
}
