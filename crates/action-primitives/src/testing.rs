//! In-process page double for tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use soulbrowser_core_types::{FrameId, LoaderId, PageEvent, PageId};
use soulbrowser_event_bus::{EventBus, EventSource, InMemoryBus};

use crate::{
    driver::{NavigationEntry, NavigationHistory, PageDriver},
    errors::ActionError,
    scope::ExecScope,
};

/// Page double: navigations update the location and publish the usual
/// lifecycle events shortly after the command returns.
pub struct FakePage {
    pub page: PageId,
    pub bus: Arc<InMemoryBus<PageEvent>>,
    pub history: Mutex<NavigationHistory>,
    pub location: Arc<Mutex<String>>,
    pub commands: Mutex<Vec<String>>,
}

impl FakePage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            page: PageId::new(),
            bus: InMemoryBus::new(64),
            history: Mutex::new(NavigationHistory::default()),
            location: Arc::new(Mutex::new("about:blank".to_string())),
            commands: Mutex::new(Vec::new()),
        })
    }

    pub fn with_history(urls: &[&str], current: i64) -> Arc<Self> {
        let fake = Self::new();
        *fake.history.lock() = NavigationHistory {
            current_index: current,
            entries: urls
                .iter()
                .enumerate()
                .map(|(idx, url)| NavigationEntry {
                    id: 100 + idx as i64,
                    url: url.to_string(),
                    title: format!("title {idx}"),
                })
                .collect(),
        };
        fake
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }

    fn load(&self, url: &str) {
        let page = self.page.clone();
        let bus = Arc::clone(&self.bus);
        let location = Arc::clone(&self.location);
        let url = url.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            *location.lock() = url.clone();
            let frame = FrameId::new();
            let events = [
                PageEvent::FrameStartedLoading {
                    page: page.clone(),
                    frame: frame.clone(),
                },
                PageEvent::FrameNavigated {
                    page: page.clone(),
                    frame,
                    loader: LoaderId::new(),
                    url,
                },
                PageEvent::DomContentEventFired {
                    page: page.clone(),
                    ts: 1,
                },
                PageEvent::LoadEventFired { page, ts: 2 },
            ];
            for event in events {
                let _ = bus.publish(event).await;
            }
        });
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn navigate(&self, scope: &ExecScope, url: &str) -> Result<(), ActionError> {
        scope.check()?;
        self.commands.lock().push(format!("navigate {url}"));
        self.load(url);
        Ok(())
    }

    async fn navigation_history(
        &self,
        scope: &ExecScope,
    ) -> Result<NavigationHistory, ActionError> {
        scope.check()?;
        Ok(self.history.lock().clone())
    }

    async fn navigate_to_history_entry(
        &self,
        scope: &ExecScope,
        entry_id: i64,
    ) -> Result<(), ActionError> {
        scope.check()?;
        self.commands.lock().push(format!("history {entry_id}"));
        let url = self
            .history
            .lock()
            .entries
            .iter()
            .find(|entry| entry.id == entry_id)
            .map(|entry| entry.url.clone())
            .ok_or_else(|| ActionError::CdpIo(format!("no entry {entry_id}")))?;
        self.load(&url);
        Ok(())
    }

    async fn reload(&self, scope: &ExecScope) -> Result<(), ActionError> {
        scope.check()?;
        self.commands.lock().push("reload".to_string());
        let url = self.location.lock().clone();
        self.load(&url);
        Ok(())
    }

    async fn stop_loading(&self, scope: &ExecScope) -> Result<(), ActionError> {
        scope.check()?;
        self.commands.lock().push("stop".to_string());
        Ok(())
    }

    async fn location(&self, scope: &ExecScope) -> Result<String, ActionError> {
        scope.check()?;
        Ok(self.location.lock().clone())
    }

    async fn title(&self, scope: &ExecScope) -> Result<String, ActionError> {
        scope.check()?;
        Ok(format!("Title of {}", self.location.lock()))
    }

    fn events(&self) -> &dyn EventSource<PageEvent> {
        self.bus.as_ref()
    }
}
