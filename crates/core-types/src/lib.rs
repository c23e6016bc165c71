use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Shared error type for the event plumbing crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SoulError {
    #[error("{message}")]
    Message { message: String },
}

impl SoulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PageId(pub String);

impl PageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FrameId(pub String);

impl FrameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies one document load inside a frame.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LoaderId(pub String);

impl LoaderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for LoaderId {
    fn default() -> Self {
        Self::new()
    }
}

/// Asynchronous notifications emitted by a remote page.
///
/// Events carry no correlation with the command that caused them, so a
/// consumer cannot tell a load triggered by its own navigation apart from
/// one left over from an earlier request.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    FrameStartedLoading {
        page: PageId,
        frame: FrameId,
    },
    FrameNavigated {
        page: PageId,
        frame: FrameId,
        loader: LoaderId,
        url: String,
    },
    NavigatedWithinDocument {
        page: PageId,
        frame: FrameId,
        url: String,
    },
    DomContentEventFired {
        page: PageId,
        ts: u64,
    },
    LoadEventFired {
        page: PageId,
        ts: u64,
    },
    FrameStoppedLoading {
        page: PageId,
        frame: FrameId,
    },
}

impl PageEvent {
    pub fn page(&self) -> &PageId {
        match self {
            PageEvent::FrameStartedLoading { page, .. }
            | PageEvent::FrameNavigated { page, .. }
            | PageEvent::NavigatedWithinDocument { page, .. }
            | PageEvent::DomContentEventFired { page, .. }
            | PageEvent::LoadEventFired { page, .. }
            | PageEvent::FrameStoppedLoading { page, .. } => page,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PageEvent::FrameStartedLoading { .. } => "frame_started_loading",
            PageEvent::FrameNavigated { .. } => "frame_navigated",
            PageEvent::NavigatedWithinDocument { .. } => "navigated_within_document",
            PageEvent::DomContentEventFired { .. } => "dom_content_event_fired",
            PageEvent::LoadEventFired { .. } => "load_event_fired",
            PageEvent::FrameStoppedLoading { .. } => "frame_stopped_loading",
        }
    }
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} page={}", self.kind(), self.page().0)
    }
}
