//! SceneLink Workspace - local scene project discovery and validation
//!
//! A workspace is bound to a working directory and enumerates the scene
//! projects found there:
//! - a `scene.json` directly in the working directory yields a single project
//! - a `scene-workspace.json` listing project folders yields several
//!
//! Projects gate preview and link: both operations validate project existence
//! and scene options before touching any transport.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod manifest;
pub mod project;
pub mod workspace;

pub use error::ValidationError;
pub use manifest::{SceneManifest, SceneOptions};
pub use project::{LocalProject, Project};
pub use workspace::{LocalWorkspace, Workspace};
