//! Error taxonomy for the session core
//!
//! - Usage errors (missing working directory) assert at construction
//! - Validation errors surface as descriptive failures; exit codes are the
//!   CLI's decision
//! - Transport errors cross transparently, preserving the collaborator's own
//!   message
//! No operation in this core retries on failure.

use crate::transport::TransportError;
use scenelink_identity::IdentityError;
use scenelink_workspace::ValidationError;
use std::path::PathBuf;
use std::time::Duration;

/// Main session error type
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Identity creation or signing failed
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Project discovery or validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A transport reported a failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The working directory does not resolve to exactly one project
    #[error("cannot link a workspace: set your current directory to a single project's folder")]
    AmbiguousWorkspace,

    /// On-disk config file could not be parsed
    #[error("config file {path} is invalid: {message}")]
    ConfigInvalid {
        /// Config file path
        path: PathBuf,
        /// Parse failure detail
        message: String,
    },

    /// The bounded link wait elapsed without an outcome
    #[error("link attempt timed out after {}s", .0.as_secs())]
    LinkTimeout(Duration),

    /// The link attempt ended without ever producing an outcome
    #[error("link attempt ended without an outcome")]
    LinkAborted,
}

impl SceneError {
    /// Whether this failure indicates user input rather than a system fault
    #[inline]
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Identity(_)
                | Self::Validation(_)
                | Self::AmbiguousWorkspace
                | Self::ConfigInvalid { .. }
        )
    }
}
