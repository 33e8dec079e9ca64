//! Local preview server
//!
//! Serves project directories statically. A single-project workspace is
//! served at the root; a multi-project workspace nests each project under
//! `/<name>`. With the watch flag set, scene manifests are polled and a
//! `PreviewChanged` event is emitted per modified project.

use async_trait::async_trait;
use axum::Router;
use scenelink_core::{PreviewFactory, PreviewTransport, TransportError};
use scenelink_events::{EventSender, SessionEvent};
use scenelink_workspace::Project;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tower_http::services::ServeDir;

/// Interval between manifest polls in watch mode
const WATCH_INTERVAL: Duration = Duration::from_secs(2);

/// Static preview server over the workspace's projects
pub struct HttpPreview {
    projects: Vec<Arc<dyn Project>>,
    watch: bool,
    events: EventSender,
}

impl HttpPreview {
    /// Preview over `projects`, reporting on `events`
    #[must_use]
    pub fn new(projects: Vec<Arc<dyn Project>>, watch: bool, events: EventSender) -> Self {
        Self {
            projects,
            watch,
            events,
        }
    }

    fn router(&self) -> Router {
        match self.projects.as_slice() {
            [only] => Router::new().fallback_service(ServeDir::new(only.root())),
            many => many.iter().fold(Router::new(), |router, project| {
                router.nest_service(
                    &format!("/{}", project.name()),
                    ServeDir::new(project.root()),
                )
            }),
        }
    }
}

#[async_trait]
impl PreviewTransport for HttpPreview {
    async fn start_server(&self, port: u16) -> Result<(), TransportError> {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|source| TransportError::Bind { port, source })?;
        let bound = listener
            .local_addr()
            .map_err(|source| TransportError::Bind { port, source })?
            .port();

        let app = self.router();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "preview server stopped");
            }
        });

        if self.watch {
            tokio::spawn(watch_manifests(self.projects.clone(), self.events.clone()));
        }

        let _ = self.events.send(SessionEvent::PreviewStarted { port: bound });
        tracing::info!(port = bound, "preview server listening");
        Ok(())
    }
}

/// Poll each project's manifest mtime, reporting changes as events
async fn watch_manifests(projects: Vec<Arc<dyn Project>>, events: EventSender) {
    let mut seen: HashMap<String, SystemTime> = HashMap::new();
    let mut ticks = tokio::time::interval(WATCH_INTERVAL);
    loop {
        ticks.tick().await;
        for project in &projects {
            let manifest = project.root().join("scene.json");
            let Ok(modified) = std::fs::metadata(&manifest).and_then(|m| m.modified()) else {
                continue;
            };
            let name = project.name();
            match seen.insert(name.clone(), modified) {
                Some(previous) if previous != modified => {
                    if events
                        .send(SessionEvent::PreviewChanged { project: name })
                        .is_err()
                    {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

/// Factory for `HttpPreview`
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpPreviewFactory;

impl PreviewFactory for HttpPreviewFactory {
    fn create(
        &self,
        projects: Vec<Arc<dyn Project>>,
        watch: bool,
        events: EventSender,
    ) -> Arc<dyn PreviewTransport> {
        Arc::new(HttpPreview::new(projects, watch, events))
    }
}
