//! SceneLink Core - session orchestration for scene preview and publication
//!
//! The session façade owns the configuration, the signing identity, and a
//! workspace of scene projects; it exposes the two user journeys:
//! - **preview**: validate every project, then serve the scene locally
//! - **link**: prove ownership of a content root by obtaining an authorized
//!   `{signature, address}` pair through the linker endpoint, settling
//!   exactly once
//!
//! # Example
//!
//! ```rust,ignore
//! use scenelink_core::{Session, SessionConfig};
//!
//! # async fn example(preview: std::sync::Arc<dyn scenelink_core::PreviewFactory>,
//! #                  linker: std::sync::Arc<dyn scenelink_core::LinkerFactory>)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::new("./my-scene");
//! let session = Session::new(config, std::env::var("SCENELINK_PRIVATE_KEY").ok().as_deref(),
//!                            preview, linker)?;
//! let outcome = session.link("bafyroot").await?;
//! println!("linked by {}", outcome.address);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod link;
pub mod session;
pub mod transport;

pub use config::{FileConfig, SessionConfig, DEFAULT_LINKER_PORT, DEFAULT_PREVIEW_PORT};
pub use error::SceneError;
pub use link::{LinkState, Settlement};
pub use session::Session;
pub use transport::{LinkerFactory, LinkerTransport, PreviewFactory, PreviewTransport, TransportError};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a SceneLink session
    pub use crate::{SceneError, Session, SessionConfig};
    pub use scenelink_events::SessionEvent;
    pub use scenelink_identity::SigningResult;
}
