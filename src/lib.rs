//! SoulBrowser action coordination
//!
//! Re-exports the coordination primitives and adds the application glue:
//! YAML configuration loading and logging initialisation.

pub mod config;
pub mod telemetry;

pub use action_primitives::*;
pub use soulbrowser_core_types::{FrameId, LoaderId, PageEvent, PageId, SoulError};
pub use soulbrowser_event_bus::{
    CancellationToken, Event, EventBus, EventCallback, EventSource, InMemoryBus,
};
