//! Transport contracts the session drives
//!
//! The preview server and the linker endpoint are external collaborators:
//! the core starts them, relays their events, and consumes one distinguished
//! success event from the linker. Their wire behavior lives elsewhere.

use async_trait::async_trait;
use scenelink_events::EventSender;
use scenelink_workspace::Project;
use std::sync::Arc;

/// Errors reported by a transport
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Could not bind the requested port
    #[error("failed to bind port {port}: {source}")]
    Bind {
        /// Requested port
        port: u16,
        /// Underlying bind failure
        source: std::io::Error,
    },

    /// Any other transport failure, in the transport's own words
    #[error("{0}")]
    Other(String),
}

/// Serves scene content locally for iterative development
#[async_trait]
pub trait PreviewTransport: Send + Sync {
    /// Bind `port` and begin serving; returns once listening
    ///
    /// Serving is long-lived and continues in the background; the caller
    /// controls process lifetime.
    async fn start_server(&self, port: u16) -> Result<(), TransportError>;
}

/// Obtains an authorized signature for a content root
///
/// Progress is reported as events; the handshake outcome arrives as a
/// distinguished `LinkSuccess` event, not as this call's return value.
#[async_trait]
pub trait LinkerTransport: Send + Sync {
    /// Bind `port` and start the linking exchange for `root_cid`
    async fn link(&self, port: u16, is_https: bool, root_cid: &str) -> Result<(), TransportError>;
}

/// Builds a preview transport bound to a set of projects
pub trait PreviewFactory: Send + Sync {
    /// Create a transport emitting its events on `events`
    fn create(
        &self,
        projects: Vec<Arc<dyn Project>>,
        watch: bool,
        events: EventSender,
    ) -> Arc<dyn PreviewTransport>;
}

/// Builds a linker transport bound to one validated project
pub trait LinkerFactory: Send + Sync {
    /// Create a transport emitting its events on `events`
    fn create(&self, project: Arc<dyn Project>, events: EventSender) -> Arc<dyn LinkerTransport>;
}
