//! Testing utilities for the SceneLink workspace
//!
//! Shared mocks and fixtures: scripted projects/workspaces and scripted
//! transports for exercising the session façade and the link coordinator.

#![allow(missing_docs)]

use async_trait::async_trait;
use scenelink_core::{
    LinkerFactory, LinkerTransport, PreviewFactory, PreviewTransport, TransportError,
};
use scenelink_events::{EventSender, SessionEvent};
use scenelink_identity::SigningResult;
use scenelink_workspace::{Project, ValidationError, Workspace};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records the order in which validations ran, as `"<project>:<step>"`
pub type ValidationLog = Arc<Mutex<Vec<String>>>;

pub fn validation_log() -> ValidationLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A project with scripted validation outcomes
#[derive(Debug)]
pub struct MockProject {
    name: String,
    root: PathBuf,
    existing_ok: bool,
    options_ok: bool,
    log: Option<ValidationLog>,
}

impl MockProject {
    pub fn valid(name: &str) -> Self {
        Self {
            name: name.to_string(),
            root: PathBuf::from(format!("/mock/{name}")),
            existing_ok: true,
            options_ok: true,
            log: None,
        }
    }

    pub fn with_invalid_options(mut self) -> Self {
        self.options_ok = false;
        self
    }

    pub fn with_missing_manifest(mut self) -> Self {
        self.existing_ok = false;
        self
    }

    pub fn with_log(mut self, log: ValidationLog) -> Self {
        self.log = Some(log);
        self
    }

    fn record(&self, step: &str) {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(format!("{}:{step}", self.name));
        }
    }
}

#[async_trait]
impl Project for MockProject {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn root(&self) -> &Path {
        &self.root
    }

    async fn validate_existing_project(&self) -> Result<(), ValidationError> {
        self.record("existing");
        if self.existing_ok {
            Ok(())
        } else {
            Err(ValidationError::ManifestMissing {
                path: self.root.join("scene.json"),
            })
        }
    }

    async fn validate_scene_options(&self) -> Result<(), ValidationError> {
        self.record("options");
        if self.options_ok {
            Ok(())
        } else {
            Err(ValidationError::NoParcels)
        }
    }
}

/// A workspace over a fixed list of projects
#[derive(Debug, Default)]
pub struct MockWorkspace {
    projects: Vec<Arc<dyn Project>>,
}

impl MockWorkspace {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_projects(projects: Vec<Arc<dyn Project>>) -> Self {
        Self { projects }
    }

    pub fn single(project: MockProject) -> Self {
        Self {
            projects: vec![Arc::new(project)],
        }
    }
}

impl Workspace for MockWorkspace {
    fn all_projects(&self) -> Vec<Arc<dyn Project>> {
        self.projects.clone()
    }
}

/// One step of a scripted link exchange
#[derive(Debug, Clone)]
pub enum LinkStep {
    /// Emit a progress event with this name
    Progress(&'static str),
    /// Emit the terminal success event
    Success(SigningResult),
    /// Return this error from `link()`
    Fail(&'static str),
}

pub fn signing_result() -> SigningResult {
    SigningResult::new("0xsigned", "0xsigner")
}

/// Linker transport that replays a scripted exchange
pub struct ScriptedLinker {
    script: Vec<LinkStep>,
    yield_between: bool,
    events: EventSender,
}

#[async_trait]
impl LinkerTransport for ScriptedLinker {
    async fn link(&self, _port: u16, _is_https: bool, _root_cid: &str) -> Result<(), TransportError> {
        for step in &self.script {
            match step {
                LinkStep::Progress(name) => {
                    let _ = self
                        .events
                        .send(SessionEvent::progress(*name, serde_json::Value::Null));
                }
                LinkStep::Success(result) => {
                    let _ = self.events.send(SessionEvent::LinkSuccess(result.clone()));
                }
                LinkStep::Fail(message) => {
                    return Err(TransportError::Other((*message).to_string()));
                }
            }
            if self.yield_between {
                // Let concurrent tasks observe each emission before the next
                // step
                tokio::task::yield_now().await;
            }
        }
        Ok(())
    }
}

/// Factory handing out `ScriptedLinker`s; counts how many were created
pub struct ScriptedLinkerFactory {
    script: Vec<LinkStep>,
    yield_between: bool,
    created: AtomicUsize,
}

impl ScriptedLinkerFactory {
    pub fn new(script: Vec<LinkStep>) -> Arc<Self> {
        Arc::new(Self {
            script,
            yield_between: true,
            created: AtomicUsize::new(0),
        })
    }

    /// Like `new`, but the linker runs its whole script without yielding:
    /// every emission and the final return land in one poll
    pub fn abrupt(script: Vec<LinkStep>) -> Arc<Self> {
        Arc::new(Self {
            script,
            yield_between: false,
            created: AtomicUsize::new(0),
        })
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl LinkerFactory for ScriptedLinkerFactory {
    fn create(&self, _project: Arc<dyn Project>, events: EventSender) -> Arc<dyn LinkerTransport> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Arc::new(ScriptedLinker {
            script: self.script.clone(),
            yield_between: self.yield_between,
            events,
        })
    }
}

/// Preview transport that records the port it was started on
pub struct StubPreview {
    events: EventSender,
    started: Arc<Mutex<Option<u16>>>,
    fail: bool,
}

#[async_trait]
impl PreviewTransport for StubPreview {
    async fn start_server(&self, port: u16) -> Result<(), TransportError> {
        if self.fail {
            return Err(TransportError::Other("preview refused to start".to_string()));
        }
        *self.started.lock().unwrap() = Some(port);
        let _ = self.events.send(SessionEvent::PreviewStarted { port });
        Ok(())
    }
}

/// Factory for `StubPreview`; exposes whether/where serving started
pub struct StubPreviewFactory {
    started: Arc<Mutex<Option<u16>>>,
    fail: bool,
}

impl StubPreviewFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Arc::new(Mutex::new(None)),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            started: Arc::new(Mutex::new(None)),
            fail: true,
        })
    }

    pub fn started_port(&self) -> Option<u16> {
        *self.started.lock().unwrap()
    }
}

impl PreviewFactory for StubPreviewFactory {
    fn create(
        &self,
        _projects: Vec<Arc<dyn Project>>,
        _watch: bool,
        events: EventSender,
    ) -> Arc<dyn PreviewTransport> {
        Arc::new(StubPreview {
            events,
            started: Arc::clone(&self.started),
            fail: self.fail,
        })
    }
}

/// Linker factory for scripts that never produce an outcome
pub fn silent_linker() -> Arc<ScriptedLinkerFactory> {
    ScriptedLinkerFactory::new(vec![LinkStep::Progress("linker:waiting")])
}
