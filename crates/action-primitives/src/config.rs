//! Tunables for the waiting primitives

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Which page event a navigation waits for when the caller does not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavWait {
    /// Wait for the page load event
    #[default]
    LoadEventFired,

    /// Wait for the frame to commit a navigation
    FrameNavigated,

    /// Return as soon as the navigation command is accepted
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Tick between retry-loop probes (milliseconds)
    pub poll_interval_ms: u64,

    /// Default navigation wait
    pub nav_wait: NavWait,

    /// Capacity of in-memory event buses
    pub event_buffer: usize,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            nav_wait: NavWait::default(),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl WaitConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
