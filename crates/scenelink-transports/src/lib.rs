//! SceneLink Transports - the HTTP collaborators the session drives
//!
//! - `preview`: serves scene project directories locally for iterative
//!   development, optionally watching manifests for changes
//! - `linker`: hosts the browser-facing linking endpoint that collects an
//!   authorized `{signature, address}` pair for a content root
//!
//! Both report progress as `SessionEvent`s; the session relays them onto its
//! own stream.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod linker;
pub mod preview;

pub use linker::{HttpLinker, HttpLinkerFactory};
pub use preview::{HttpPreview, HttpPreviewFactory};
