//! Workspace contract and local discovery

use crate::error::ValidationError;
use crate::manifest::MANIFEST_FILE;
use crate::project::{LocalProject, Project};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the multi-project workspace file at a working directory
pub const WORKSPACE_FILE: &str = "scene-workspace.json";

/// A set of scene projects under one working directory
pub trait Workspace: Send + Sync + std::fmt::Debug {
    /// All discovered projects, in enumeration order
    fn all_projects(&self) -> Vec<Arc<dyn Project>>;

    /// The single project, when the working directory holds exactly one
    fn single_project(&self) -> Option<Arc<dyn Project>> {
        let projects = self.all_projects();
        match projects.as_slice() {
            [only] => Some(Arc::clone(only)),
            _ => None,
        }
    }
}

/// `scene-workspace.json` shape: a list of project folders
#[derive(Debug, Deserialize)]
struct WorkspaceFile {
    folders: Vec<PathBuf>,
}

/// Workspace discovered from the local filesystem
#[derive(Debug)]
pub struct LocalWorkspace {
    working_dir: PathBuf,
    projects: Vec<Arc<dyn Project>>,
}

impl LocalWorkspace {
    /// Discover the projects under `working_dir`
    ///
    /// A `scene.json` directly in the working directory yields a single
    /// project. Otherwise a `scene-workspace.json` listing project folders
    /// yields one project per folder. Neither file yields an empty
    /// workspace; emptiness surfaces later, when an operation needs a
    /// project.
    ///
    /// # Errors
    /// - `ValidationError::ManifestInvalid` if the workspace file is present
    ///   but unparseable
    /// - `ValidationError::Io` on filesystem failures
    pub fn open(working_dir: impl Into<PathBuf>) -> Result<Self, ValidationError> {
        let working_dir = working_dir.into();

        let mut projects: Vec<Arc<dyn Project>> = Vec::new();
        if working_dir.join(MANIFEST_FILE).exists() {
            projects.push(Arc::new(LocalProject::new(&working_dir)));
        } else {
            let workspace_file = working_dir.join(WORKSPACE_FILE);
            if workspace_file.exists() {
                let raw = std::fs::read_to_string(&workspace_file)?;
                let parsed: WorkspaceFile = serde_json::from_str(&raw).map_err(|source| {
                    ValidationError::ManifestInvalid {
                        path: workspace_file,
                        source,
                    }
                })?;
                for folder in parsed.folders {
                    projects.push(Arc::new(LocalProject::new(working_dir.join(folder))));
                }
            }
        }

        tracing::debug!(
            working_dir = %working_dir.display(),
            projects = projects.len(),
            "workspace opened"
        );
        Ok(Self {
            working_dir,
            projects,
        })
    }

    /// Working directory this workspace is bound to
    #[inline]
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl Workspace for LocalWorkspace {
    fn all_projects(&self) -> Vec<Arc<dyn Project>> {
        self.projects.clone()
    }
}
