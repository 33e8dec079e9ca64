//! Scene project contract and local implementation

use crate::error::ValidationError;
use crate::manifest::{SceneManifest, MANIFEST_FILE};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A scene project the core can validate before preview or link
///
/// Both validations either complete or fail with a descriptive error; the
/// core treats them as opaque preconditions.
#[async_trait]
pub trait Project: Send + Sync + std::fmt::Debug {
    /// Short project name, for logs and events
    fn name(&self) -> String;

    /// Project root directory
    fn root(&self) -> &Path;

    /// Check that the project exists and its manifest parses
    async fn validate_existing_project(&self) -> Result<(), ValidationError>;

    /// Check the scene options (entry point, parcel layout)
    async fn validate_scene_options(&self) -> Result<(), ValidationError>;
}

/// A project rooted in a local directory with a `scene.json`
#[derive(Debug, Clone)]
pub struct LocalProject {
    root: PathBuf,
}

impl LocalProject {
    /// Bind a project to a root directory
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Read and parse the project's manifest
    pub async fn manifest(&self) -> Result<SceneManifest, ValidationError> {
        let path = self.manifest_path();
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ValidationError::ManifestMissing { path });
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map_err(|source| ValidationError::ManifestInvalid { path, source })
    }
}

#[async_trait]
impl Project for LocalProject {
    fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    fn root(&self) -> &Path {
        &self.root
    }

    async fn validate_existing_project(&self) -> Result<(), ValidationError> {
        self.manifest().await?;
        tracing::debug!(project = %self.name(), "project manifest ok");
        Ok(())
    }

    async fn validate_scene_options(&self) -> Result<(), ValidationError> {
        let manifest = self.manifest().await?;
        manifest.scene.validate()?;

        let entry = self.root.join(&manifest.main);
        if !tokio::fs::try_exists(&entry).await.unwrap_or(false) {
            return Err(ValidationError::MissingEntryPoint {
                main: manifest.main,
            });
        }
        tracing::debug!(project = %self.name(), "scene options ok");
        Ok(())
    }
}
