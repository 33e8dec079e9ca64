//! Session façade
//!
//! Owns the configuration, the optional signing identity, and the workspace;
//! exposes the preview and link journeys plus the signing operations the
//! linker transport consumes. Events from both transports are re-emitted on
//! the session's own stream.

use crate::config::SessionConfig;
use crate::error::SceneError;
use crate::link::LinkCoordinator;
use crate::transport::{LinkerFactory, PreviewFactory};
use scenelink_events::{channel, relay, EventReceiver, EventSender};
use scenelink_identity::{Identity, IdentityError, SigningResult};
use scenelink_workspace::{LocalWorkspace, Workspace};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// The orchestrating session behind the CLI
pub struct Session {
    config: SessionConfig,
    workspace: Arc<dyn Workspace>,
    identity: Option<Identity>,
    preview_factory: Arc<dyn PreviewFactory>,
    linker_factory: Arc<dyn LinkerFactory>,
    events: EventSender,
    events_rx: Mutex<Option<EventReceiver>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("identity", &self.identity.is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session bound to the working directory in `config`
    ///
    /// The secret is injected explicitly; the CLI, not the core, reads the
    /// environment. When present, the identity is created eagerly; an
    /// invalid secret fails construction (and is reported, not fatal to the
    /// process - the caller decides what to do with it).
    ///
    /// # Panics
    /// If the working directory is empty: that is caller misuse, not user
    /// input.
    ///
    /// # Errors
    /// - `SceneError::Identity` for an unusable secret
    /// - `SceneError::Validation` / `SceneError::ConfigInvalid` when
    ///   discovery of the workspace or config file fails
    pub fn new(
        config: SessionConfig,
        secret: Option<&str>,
        preview_factory: Arc<dyn PreviewFactory>,
        linker_factory: Arc<dyn LinkerFactory>,
    ) -> Result<Self, SceneError> {
        assert!(
            !config.working_dir.as_os_str().is_empty(),
            "working directory is missing"
        );
        let workspace = Arc::new(LocalWorkspace::open(&config.working_dir)?);
        Self::with_workspace(config, secret, workspace, preview_factory, linker_factory)
    }

    /// Create a session over an already-built workspace
    pub fn with_workspace(
        config: SessionConfig,
        secret: Option<&str>,
        workspace: Arc<dyn Workspace>,
        preview_factory: Arc<dyn PreviewFactory>,
        linker_factory: Arc<dyn LinkerFactory>,
    ) -> Result<Self, SceneError> {
        assert!(
            !config.working_dir.as_os_str().is_empty(),
            "working directory is missing"
        );
        let config = config.resolve()?;
        tracing::debug!(working_dir = %config.working_dir.display(), "session starting");

        let identity = secret.map(Identity::from_secret).transpose()?;
        let (events, events_rx) = channel();

        Ok(Self {
            config,
            workspace,
            identity,
            preview_factory,
            linker_factory,
            events,
            events_rx: Mutex::new(Some(events_rx)),
        })
    }

    /// Working directory this session is bound to
    #[inline]
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.config.working_dir
    }

    /// Whether preview should watch projects for changes
    #[inline]
    #[must_use]
    pub fn watch(&self) -> bool {
        self.config.watch()
    }

    /// Effective configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Take the session's event stream
    ///
    /// The stream carries every event re-emitted from the preview and linker
    /// transports. There is one stream per session; the second take yields
    /// `None`.
    #[must_use]
    pub fn take_events(&self) -> Option<EventReceiver> {
        self.events_rx.lock().ok().and_then(|mut guard| guard.take())
    }

    /// Validate every project, then start the local preview server
    ///
    /// Validation is sequential in the workspace's enumeration order and
    /// fails fast: the first invalid project surfaces and the server is not
    /// started. Returns once the server is listening; serving continues in
    /// the background.
    pub async fn preview(&self) -> Result<(), SceneError> {
        for project in self.workspace.all_projects() {
            project.validate_existing_project().await?;
            project.validate_scene_options().await?;
        }

        let (transport_tx, transport_rx) = channel();
        let preview =
            self.preview_factory
                .create(self.workspace.all_projects(), self.watch(), transport_tx);
        let _relay = relay(transport_rx, self.events.clone());

        preview.start_server(self.config.preview_port()).await?;
        tracing::info!(port = self.config.preview_port(), "preview serving");
        Ok(())
    }

    /// Public address of the session's identity
    ///
    /// # Errors
    /// `IdentityError::NoIdentity` when no secret was supplied at
    /// construction.
    pub async fn get_public_address(&self) -> Result<String, SceneError> {
        let identity = self.identity.as_ref().ok_or(IdentityError::NoIdentity)?;
        Ok(identity.derive_address())
    }

    /// Sign `message`, producing the address and signature as one pair
    ///
    /// # Errors
    /// `IdentityError::NoIdentity` when no secret was supplied at
    /// construction; signing without an identity is a usage error, not a
    /// recoverable condition.
    pub async fn get_address_and_signature(
        &self,
        message: &str,
    ) -> Result<SigningResult, SceneError> {
        let identity = self.identity.as_ref().ok_or(IdentityError::NoIdentity)?;
        Ok(identity.sign(message).await)
    }

    /// Run the linking handshake for `root_cid`
    ///
    /// Resolves the single project, validates it, starts the linker
    /// transport, and settles exactly once with the authorized
    /// `{signature, address}` pair or the transport's error.
    pub async fn link(&self, root_cid: &str) -> Result<SigningResult, SceneError> {
        LinkCoordinator::new(
            Arc::clone(&self.workspace),
            Arc::clone(&self.linker_factory),
            self.events.clone(),
            self.config.clone(),
        )
        .run(root_cid)
        .await
    }
}
