//! Linking Coordinator - drives one link attempt to a single terminal outcome
//!
//! Per invocation the coordinator moves through
//! `Idle → Resolving → Validating → Linking → Settled` and settles exactly
//! once, whichever arrives first:
//! - the transport's `LinkSuccess` event (success), or
//! - a transport error from `link()` (failure, passed through verbatim).
//!
//! Duplicate success events and errors arriving after settlement are
//! discarded; the guarantee is structural (a single-assignment settlement
//! cell), not an emergent property of future polling order.

use crate::config::SessionConfig;
use crate::error::SceneError;
use crate::transport::LinkerFactory;
use scenelink_events::{channel, relay, EventSender, SessionEvent};
use scenelink_identity::SigningResult;
use scenelink_workspace::Workspace;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// States of one link attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing started yet
    Idle,
    /// Resolving the single project from the workspace
    Resolving,
    /// Running project validations
    Validating,
    /// Transport running, awaiting the terminal signal
    Linking,
    /// Terminal; an outcome was produced
    Settled,
}

impl LinkState {
    /// States reachable from `self`
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [LinkState] {
        use LinkState::*;
        match self {
            Idle => &[Resolving],
            Resolving => &[Validating],
            Validating => &[Linking],
            Linking => &[Settled],
            Settled => &[],
        }
    }
}

/// One-shot completion cell
///
/// Wraps a oneshot sender so that only the first `settle` wins; all later
/// attempts report `false` and carry no observable effect.
#[derive(Debug)]
pub struct Settlement<T> {
    tx: Mutex<Option<oneshot::Sender<T>>>,
}

impl<T> Settlement<T> {
    /// Create a settlement cell and the receiver for its outcome
    #[must_use]
    pub fn new() -> (Arc<Self>, oneshot::Receiver<T>) {
        let (tx, rx) = oneshot::channel();
        (
            Arc::new(Self {
                tx: Mutex::new(Some(tx)),
            }),
            rx,
        )
    }

    /// Settle with `value`; returns whether this call won
    pub fn settle(&self, value: T) -> bool {
        let sender = self.tx.lock().map(|mut guard| guard.take()).ok().flatten();
        match sender {
            // A dropped receiver still counts as winning the settlement;
            // nobody else may settle after us.
            Some(tx) => {
                let _ = tx.send(value);
                true
            }
            None => false,
        }
    }

    /// Whether an outcome was already produced
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.tx.lock().map(|guard| guard.is_none()).unwrap_or(true)
    }
}

/// Coordinator for a single link attempt
pub(crate) struct LinkCoordinator {
    workspace: Arc<dyn Workspace>,
    factory: Arc<dyn LinkerFactory>,
    session_events: EventSender,
    config: SessionConfig,
    state: LinkState,
}

impl LinkCoordinator {
    pub(crate) fn new(
        workspace: Arc<dyn Workspace>,
        factory: Arc<dyn LinkerFactory>,
        session_events: EventSender,
        config: SessionConfig,
    ) -> Self {
        Self {
            workspace,
            factory,
            session_events,
            config,
            state: LinkState::Idle,
        }
    }

    fn transition(&mut self, to: LinkState) {
        debug_assert!(
            self.state.allowed_transitions().contains(&to),
            "illegal link transition {:?} -> {:?}",
            self.state,
            to
        );
        tracing::debug!(from = ?self.state, to = ?to, "link state");
        self.state = to;
    }

    /// Drive the attempt to its terminal outcome
    pub(crate) async fn run(mut self, root_cid: &str) -> Result<SigningResult, SceneError> {
        self.transition(LinkState::Resolving);
        let project = self
            .workspace
            .single_project()
            .ok_or(SceneError::AmbiguousWorkspace)?;

        self.transition(LinkState::Validating);
        project.validate_existing_project().await?;
        project.validate_scene_options().await?;

        self.transition(LinkState::Linking);
        tracing::info!(project = %project.name(), root_cid, "starting link handshake");

        let (transport_tx, mut transport_rx) = channel();
        let linker = self.factory.create(Arc::clone(&project), transport_tx);

        let (settlement, outcome) = Settlement::new();

        // Transport events are handed on to the session's stream untouched.
        let (watched_tx, watched_rx) = channel();
        let _relay = relay(watched_rx, self.session_events.clone());

        let link_result = linker
            .link(self.config.linker_port(), self.config.is_https(), root_cid)
            .await;

        // Everything the transport emitted before `link()` returned is
        // already queued. Draining it first keeps the settlement in emission
        // order: a success sent ahead of the transport error wins.
        while let Ok(event) = transport_rx.try_recv() {
            observe(&settlement, &watched_tx, event);
        }
        if let Err(e) = link_result {
            // Passed through verbatim; a loss here means success already won
            if !settlement.settle(Err(e.into())) {
                tracing::debug!("transport error after settlement ignored");
            }
        }

        // The linker endpoint may still be serving; later events keep
        // flowing until its sender closes.
        let watcher = Arc::clone(&settlement);
        tokio::spawn(async move {
            while let Some(event) = transport_rx.recv().await {
                observe(&watcher, &watched_tx, event);
            }
        });

        let result = match self.config.link_timeout {
            Some(limit) => tokio::time::timeout(limit, outcome)
                .await
                .map_err(|_| SceneError::LinkTimeout(limit))?,
            None => outcome.await,
        };
        self.transition(LinkState::Settled);

        // The cell's sender outlives this scope, so a recv error means the
        // runtime tore the task down mid-flight.
        result.unwrap_or(Err(SceneError::LinkAborted))
    }
}

/// Note a transport event: the first `LinkSuccess` settles the attempt, and
/// every event is forwarded to the session's stream regardless.
fn observe(
    settlement: &Settlement<Result<SigningResult, SceneError>>,
    session: &EventSender,
    event: SessionEvent,
) {
    if let SessionEvent::LinkSuccess(result) = &event {
        if !settlement.settle(Ok(result.clone())) {
            tracing::debug!("duplicate link success ignored");
        }
    }
    let _ = session.send(event);
}
