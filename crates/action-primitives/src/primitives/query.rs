//! Query primitives - read page state into output slots

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    action::Action,
    driver::{NavigationEntry, PageDriver},
    errors::ActionError,
    scope::ExecScope,
    slot::OutputSlot,
};

/// Retrieve the page's navigation history.
pub struct NavigationEntries {
    driver: Arc<dyn PageDriver>,
    current_index: OutputSlot<i64>,
    entries: OutputSlot<Vec<NavigationEntry>>,
}

impl NavigationEntries {
    pub fn new(
        driver: Arc<dyn PageDriver>,
        current_index: OutputSlot<i64>,
        entries: OutputSlot<Vec<NavigationEntry>>,
    ) -> Self {
        Self {
            driver,
            current_index,
            entries,
        }
    }
}

#[async_trait]
impl Action for NavigationEntries {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        let history = self.driver.navigation_history(scope).await?;
        self.current_index.set(history.current_index);
        self.entries.set(history.entries);
        Ok(())
    }
}

/// Retrieve the document location.
pub struct Location {
    driver: Arc<dyn PageDriver>,
    url: OutputSlot<String>,
}

impl Location {
    pub fn new(driver: Arc<dyn PageDriver>, url: OutputSlot<String>) -> Self {
        Self { driver, url }
    }
}

#[async_trait]
impl Action for Location {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        let url = self.driver.location(scope).await?;
        self.url.set(url);
        Ok(())
    }
}

/// Retrieve the document title.
pub struct Title {
    driver: Arc<dyn PageDriver>,
    title: OutputSlot<String>,
}

impl Title {
    pub fn new(driver: Arc<dyn PageDriver>, title: OutputSlot<String>) -> Self {
        Self { driver, title }
    }
}

#[async_trait]
impl Action for Title {
    async fn run(&self, scope: &ExecScope) -> Result<(), ActionError> {
        let title = self.driver.title(scope).await?;
        self.title.set(title);
        Ok(())
    }
}
