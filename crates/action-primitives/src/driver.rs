//! Remote page collaborator
//!
//! The wire protocol lives behind [`PageDriver`]; primitives only issue
//! commands through it and listen to the page events it exposes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use soulbrowser_core_types::PageEvent;
use soulbrowser_event_bus::EventSource;

use crate::{errors::ActionError, scope::ExecScope};

/// One entry of a page's session history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    pub id: i64,
    pub url: String,
    pub title: String,
}

/// Session history snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationHistory {
    /// Index of the current entry in `entries`
    pub current_index: i64,
    pub entries: Vec<NavigationEntry>,
}

impl NavigationHistory {
    /// Id of the entry `step` positions away from the current one.
    pub fn relative_entry(&self, step: i64) -> Result<i64, ActionError> {
        let last = self.entries.len() as i64 - 1;
        let current = self.current_index;
        let target = current + step;
        if current < 0 || current > last || target < 0 || target > last {
            return Err(ActionError::InvalidHistoryEntry {
                current,
                len: self.entries.len(),
            });
        }
        Ok(self.entries[target as usize].id)
    }
}

#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Issue a navigation; returns once the command is accepted.
    async fn navigate(&self, scope: &ExecScope, url: &str) -> Result<(), ActionError>;

    async fn navigation_history(&self, scope: &ExecScope) -> Result<NavigationHistory, ActionError>;

    async fn navigate_to_history_entry(
        &self,
        scope: &ExecScope,
        entry_id: i64,
    ) -> Result<(), ActionError>;

    async fn reload(&self, scope: &ExecScope) -> Result<(), ActionError>;

    /// Stop all navigation and pending resource retrieval
    async fn stop_loading(&self, scope: &ExecScope) -> Result<(), ActionError>;

    /// Current document location
    async fn location(&self, scope: &ExecScope) -> Result<String, ActionError>;

    async fn title(&self, scope: &ExecScope) -> Result<String, ActionError>;

    /// Lifecycle events of this page
    fn events(&self) -> &dyn EventSource<PageEvent>;
}
