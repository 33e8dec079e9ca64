//! Session configuration
//!
//! Immutable after construction. Explicit values win over the discovered
//! `scenelink.toml`, which wins over the defaults.

use crate::error::SceneError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default port of the local preview server
pub const DEFAULT_PREVIEW_PORT: u16 = 8000;
/// Default port of the linker endpoint
pub const DEFAULT_LINKER_PORT: u16 = 4044;
/// Name of the on-disk config file in a working directory
pub const CONFIG_FILE: &str = "scenelink.toml";

/// Values loadable from `scenelink.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileConfig {
    /// Preview server port
    pub preview_port: Option<u16>,
    /// Linker endpoint port
    pub linker_port: Option<u16>,
    /// Advertise https URLs
    pub is_https: Option<bool>,
    /// Watch projects for changes during preview
    pub watch: Option<bool>,
    /// Bound on the link handshake, in seconds
    pub link_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load the config file under `working_dir`, if present
    ///
    /// # Errors
    /// `SceneError::ConfigInvalid` if the file exists but does not parse.
    pub fn discover(working_dir: &Path) -> Result<Option<Self>, SceneError> {
        let path = working_dir.join(CONFIG_FILE);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SceneError::ConfigInvalid {
                    path,
                    message: e.to_string(),
                })
            }
        };
        let parsed = toml::from_str(&raw).map_err(|e| SceneError::ConfigInvalid {
            path,
            message: e.to_string(),
        })?;
        Ok(Some(parsed))
    }
}

/// Session configuration
///
/// Only the working directory is required; everything else falls back to the
/// discovered file config and then to defaults.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Working directory the workspace is bound to (required, non-empty)
    pub working_dir: PathBuf,
    /// Preview server port
    pub preview_port: Option<u16>,
    /// Linker endpoint port
    pub linker_port: Option<u16>,
    /// Advertise https URLs
    pub is_https: Option<bool>,
    /// Watch projects for changes during preview
    pub watch: Option<bool>,
    /// Skip deployment safety checks
    pub force_deploy: bool,
    /// Assume "yes" on confirmation prompts
    pub confirm: bool,
    /// Pre-supplied file config; discovered from disk when absent
    pub file_config: Option<FileConfig>,
    /// Bound on the link handshake; unbounded when absent
    pub link_timeout: Option<Duration>,
}

impl SessionConfig {
    /// Configuration rooted at `working_dir`
    #[inline]
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Self::default()
        }
    }

    /// With an explicit preview port
    #[inline]
    #[must_use]
    pub fn with_preview_port(mut self, port: u16) -> Self {
        self.preview_port = Some(port);
        self
    }

    /// With an explicit linker port
    #[inline]
    #[must_use]
    pub fn with_linker_port(mut self, port: u16) -> Self {
        self.linker_port = Some(port);
        self
    }

    /// With the https flag
    #[inline]
    #[must_use]
    pub fn with_https(mut self, is_https: bool) -> Self {
        self.is_https = Some(is_https);
        self
    }

    /// With the watch flag
    #[inline]
    #[must_use]
    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = Some(watch);
        self
    }

    /// With a pre-supplied file config (skips discovery)
    #[inline]
    #[must_use]
    pub fn with_file_config(mut self, file_config: FileConfig) -> Self {
        self.file_config = Some(file_config);
        self
    }

    /// With a bounded link handshake
    #[inline]
    #[must_use]
    pub fn with_link_timeout(mut self, timeout: Duration) -> Self {
        self.link_timeout = Some(timeout);
        self
    }

    /// Fill `file_config` from disk when none was supplied
    pub(crate) fn resolve(mut self) -> Result<Self, SceneError> {
        if self.file_config.is_none() {
            self.file_config = FileConfig::discover(&self.working_dir)?;
        }
        if self.link_timeout.is_none() {
            self.link_timeout = self
                .file_config
                .as_ref()
                .and_then(|f| f.link_timeout_secs)
                .map(Duration::from_secs);
        }
        Ok(self)
    }

    fn file(&self) -> Option<&FileConfig> {
        self.file_config.as_ref()
    }

    /// Effective preview port
    #[must_use]
    pub fn preview_port(&self) -> u16 {
        self.preview_port
            .or_else(|| self.file().and_then(|f| f.preview_port))
            .unwrap_or(DEFAULT_PREVIEW_PORT)
    }

    /// Effective linker port
    #[must_use]
    pub fn linker_port(&self) -> u16 {
        self.linker_port
            .or_else(|| self.file().and_then(|f| f.linker_port))
            .unwrap_or(DEFAULT_LINKER_PORT)
    }

    /// Effective https flag
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.is_https
            .or_else(|| self.file().and_then(|f| f.is_https))
            .unwrap_or(false)
    }

    /// Effective watch flag
    #[must_use]
    pub fn watch(&self) -> bool {
        self.watch
            .or_else(|| self.file().and_then(|f| f.watch))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let config = SessionConfig::new("/tmp/scene");
        assert_eq!(config.preview_port(), DEFAULT_PREVIEW_PORT);
        assert_eq!(config.linker_port(), DEFAULT_LINKER_PORT);
        assert!(!config.is_https());
        assert!(!config.watch());
    }

    #[test]
    fn explicit_values_win_over_file() {
        let file = FileConfig {
            preview_port: Some(9999),
            watch: Some(true),
            ..FileConfig::default()
        };
        let config = SessionConfig::new("/tmp/scene")
            .with_file_config(file)
            .with_preview_port(8080);

        assert_eq!(config.preview_port(), 8080);
        // No explicit watch, so the file value applies
        assert!(config.watch());
    }

    #[test]
    fn file_discovery_missing_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(FileConfig::discover(dir.path()).unwrap().is_none());
    }

    #[test]
    fn file_discovery_parses_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "preview_port = 8123\nlink_timeout_secs = 90\n",
        )
        .unwrap();

        let file = FileConfig::discover(dir.path()).unwrap().unwrap();
        assert_eq!(file.preview_port, Some(8123));

        let config = SessionConfig::new(dir.path()).resolve().unwrap();
        assert_eq!(config.preview_port(), 8123);
        assert_eq!(config.link_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn broken_config_file_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "preview_port = <=").unwrap();
        let err = FileConfig::discover(dir.path()).unwrap_err();
        assert!(matches!(err, SceneError::ConfigInvalid { .. }));
    }
}
