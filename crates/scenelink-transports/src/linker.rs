//! Browser-facing linking endpoint
//!
//! One link attempt hosts a small HTTP endpoint the user opens in a signing
//! browser. The page shows the content root awaiting a signature; the signer
//! posts the authorized `{signature, address}` pair back, which surfaces as
//! the `LinkSuccess` event the coordinator settles on.

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use scenelink_core::{LinkerFactory, LinkerTransport, TransportError};
use scenelink_events::{EventSender, SessionEvent};
use scenelink_identity::SigningResult;
use scenelink_workspace::Project;
use std::sync::Arc;

/// Linker endpoint bound to one validated project
pub struct HttpLinker {
    project: Arc<dyn Project>,
    events: EventSender,
}

#[derive(Clone)]
struct LinkerState {
    events: EventSender,
    scene: Arc<str>,
    root_cid: Arc<str>,
}

impl HttpLinker {
    /// Endpoint for `project`, reporting on `events`
    #[must_use]
    pub fn new(project: Arc<dyn Project>, events: EventSender) -> Self {
        Self { project, events }
    }
}

#[async_trait]
impl LinkerTransport for HttpLinker {
    async fn link(&self, port: u16, is_https: bool, root_cid: &str) -> Result<(), TransportError> {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|source| TransportError::Bind { port, source })?;
        let bound = listener
            .local_addr()
            .map_err(|source| TransportError::Bind { port, source })?
            .port();

        if is_https {
            // TLS termination is external; the endpoint itself always
            // serves plain HTTP.
            tracing::warn!("https requested but no TLS termination is configured, serving http");
        }

        let state = LinkerState {
            events: self.events.clone(),
            scene: Arc::from(self.project.name().as_str()),
            root_cid: Arc::from(root_cid),
        };
        let app = Router::new()
            .route("/", get(landing))
            .route("/api/link", post(submit))
            .with_state(state);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "linker endpoint stopped");
            }
        });

        let url = format!("http://127.0.0.1:{bound}/");
        tracing::info!(%url, root_cid, "linker endpoint listening");
        let _ = self.events.send(SessionEvent::LinkReady { url });
        Ok(())
    }
}

async fn landing(State(state): State<LinkerState>) -> Html<String> {
    Html(format!(
        "<!doctype html><html><body>\
         <h1>Link scene {scene}</h1>\
         <p>Content root awaiting signature: <code>{cid}</code></p>\
         <p>POST the signed payload to <code>/api/link</code>.</p>\
         </body></html>",
        scene = state.scene,
        cid = state.root_cid,
    ))
}

async fn submit(
    State(state): State<LinkerState>,
    Json(payload): Json<SigningResult>,
) -> StatusCode {
    tracing::info!(address = %payload.address, "link signature received");
    let _ = state.events.send(SessionEvent::LinkSuccess(payload));
    StatusCode::OK
}

/// Factory for `HttpLinker`
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpLinkerFactory;

impl LinkerFactory for HttpLinkerFactory {
    fn create(&self, project: Arc<dyn Project>, events: EventSender) -> Arc<dyn LinkerTransport> {
        Arc::new(HttpLinker::new(project, events))
    }
}
