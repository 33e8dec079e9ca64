//! Session event union
//!
//! One enumerated union covers both transports' vocabularies. Components can
//! still introduce new progress notifications without a session change by
//! using the generic `Progress` variant.

use scenelink_identity::SigningResult;
use serde::{Deserialize, Serialize};

/// Sending half of a component's event stream
pub type EventSender = tokio::sync::mpsc::UnboundedSender<SessionEvent>;
/// Receiving half of a component's event stream
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<SessionEvent>;

/// Events observable on a session's event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Preview server is listening
    PreviewStarted {
        /// Port the server is bound to
        port: u16,
    },
    /// Preview server noticed a change in a watched project
    PreviewChanged {
        /// Project that changed
        project: String,
    },
    /// Linker endpoint is listening and awaiting a signature
    LinkReady {
        /// URL the user opens in a signing browser
        url: String,
    },
    /// Linker handshake completed with an authorized signature
    ///
    /// The first emission settles the link attempt; later duplicates are
    /// ignored by the coordinator.
    LinkSuccess(SigningResult),
    /// Open-vocabulary progress notification from any component
    Progress {
        /// Event name as reported by the component
        name: String,
        /// Component-defined payload
        payload: serde_json::Value,
    },
}

impl SessionEvent {
    /// Progress event from a name and payload
    #[inline]
    #[must_use]
    pub fn progress(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::Progress {
            name: name.into(),
            payload,
        }
    }

    /// Short name of the event kind, for logging
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::PreviewStarted { .. } => "preview:started",
            Self::PreviewChanged { .. } => "preview:changed",
            Self::LinkReady { .. } => "link:ready",
            Self::LinkSuccess(_) => "link:success",
            Self::Progress { name, .. } => name,
        }
    }
}

/// Create a fresh component event channel
#[inline]
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
