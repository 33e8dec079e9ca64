//! Link coordinator integration tests: settlement, ambiguity, validation
//! gating, and the bounded wait.

use scenelink_core::{LinkerFactory, SceneError, Session, SessionConfig};
use scenelink_events::SessionEvent;
use scenelink_identity::SigningResult;
use scenelink_test_utils::{
    silent_linker, signing_result, LinkStep, MockProject, MockWorkspace, ScriptedLinkerFactory,
    StubPreviewFactory,
};
use std::sync::Arc;
use std::time::Duration;

fn session(
    workspace: MockWorkspace,
    linker: Arc<ScriptedLinkerFactory>,
) -> (Session, Arc<ScriptedLinkerFactory>) {
    let config = SessionConfig::new("/mock-working-dir");
    let session = Session::with_workspace(
        config,
        None,
        Arc::new(workspace),
        StubPreviewFactory::new(),
        Arc::clone(&linker) as Arc<dyn LinkerFactory>,
    )
    .unwrap();
    (session, linker)
}

#[tokio::test]
async fn link_resolves_with_success_payload() {
    let linker = ScriptedLinkerFactory::new(vec![
        LinkStep::Progress("linker:open"),
        LinkStep::Success(signing_result()),
    ]);
    let (session, linker) = session(MockWorkspace::single(MockProject::valid("plaza")), linker);

    let outcome = session.link("bafyroot").await.unwrap();
    assert_eq!(outcome, signing_result());
    assert_eq!(linker.created(), 1);
}

#[tokio::test]
async fn link_settles_exactly_once() {
    // The transport misbehaves: duplicate success events, then an error.
    // The first outcome wins; the later signals have no observable effect.
    let first = SigningResult::new("0xfirst", "0xaddr");
    let second = SigningResult::new("0xsecond", "0xaddr");
    let linker = ScriptedLinkerFactory::new(vec![
        LinkStep::Success(first.clone()),
        LinkStep::Success(second),
        LinkStep::Fail("late transport failure"),
    ]);
    let (session, _) = session(MockWorkspace::single(MockProject::valid("plaza")), linker);

    let outcome = session.link("bafyroot").await.unwrap();
    assert_eq!(outcome, first);

    // A second attempt still works; settlement is per invocation
    let outcome = session.link("bafyroot").await.unwrap();
    assert_eq!(outcome, first);
}

#[tokio::test]
async fn success_emitted_before_the_error_wins() {
    // The transport reports success and then fails in the same poll, giving
    // no other task a chance to run in between. The queued success was
    // emitted first, so it must settle the attempt ahead of the error.
    let linker = ScriptedLinkerFactory::abrupt(vec![
        LinkStep::Success(signing_result()),
        LinkStep::Fail("connection dropped after signing"),
    ]);
    let (session, _) = session(MockWorkspace::single(MockProject::valid("plaza")), linker);

    let outcome = session.link("bafyroot").await.unwrap();
    assert_eq!(outcome, signing_result());
}

#[tokio::test]
async fn link_rejects_with_transport_error_verbatim() {
    let linker = ScriptedLinkerFactory::new(vec![LinkStep::Fail("linker refused the handshake")]);
    let (session, _) = session(MockWorkspace::single(MockProject::valid("plaza")), linker);

    let err = session.link("bafyroot").await.unwrap_err();
    assert!(matches!(err, SceneError::Transport(_)));
    assert_eq!(err.to_string(), "linker refused the handshake");
}

#[tokio::test]
async fn empty_workspace_is_ambiguous() {
    let linker = silent_linker();
    let (session, linker) = session(MockWorkspace::empty(), linker);

    let err = session.link("bafyroot").await.unwrap_err();
    assert!(matches!(err, SceneError::AmbiguousWorkspace));
    // No transport was constructed
    assert_eq!(linker.created(), 0);
}

#[tokio::test]
async fn multi_project_workspace_is_ambiguous() {
    let workspace = MockWorkspace::with_projects(vec![
        Arc::new(MockProject::valid("plaza")),
        Arc::new(MockProject::valid("tower")),
    ]);
    let (session, linker) = session(workspace, silent_linker());

    let err = session.link("bafyroot").await.unwrap_err();
    assert!(matches!(err, SceneError::AmbiguousWorkspace));
    assert_eq!(linker.created(), 0);
}

#[tokio::test]
async fn failed_validation_blocks_the_transport() {
    let workspace = MockWorkspace::single(MockProject::valid("plaza").with_invalid_options());
    let (session, linker) = session(workspace, silent_linker());

    let err = session.link("bafyroot").await.unwrap_err();
    assert!(matches!(err, SceneError::Validation(_)));
    assert_eq!(linker.created(), 0);
}

#[tokio::test]
async fn bounded_wait_times_out_on_silent_transport() {
    let config = SessionConfig::new("/mock-working-dir")
        .with_link_timeout(Duration::from_millis(50));
    let session = Session::with_workspace(
        config,
        None,
        Arc::new(MockWorkspace::single(MockProject::valid("plaza"))),
        StubPreviewFactory::new(),
        silent_linker(),
    )
    .unwrap();

    let err = session.link("bafyroot").await.unwrap_err();
    assert!(matches!(err, SceneError::LinkTimeout(_)));
}

#[tokio::test]
async fn transport_events_reach_the_session_stream() {
    let linker = ScriptedLinkerFactory::new(vec![
        LinkStep::Progress("linker:open"),
        LinkStep::Progress("linker:waiting"),
        LinkStep::Success(signing_result()),
    ]);
    let (session, _) = session(MockWorkspace::single(MockProject::valid("plaza")), linker);
    let mut events = session.take_events().unwrap();

    session.link("bafyroot").await.unwrap();

    let mut names = Vec::new();
    for _ in 0..3 {
        let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
            .await
            .expect("relayed event")
            .expect("stream open");
        names.push(event.name().to_string());
        if let SessionEvent::LinkSuccess(result) = event {
            assert_eq!(result, signing_result());
        }
    }
    assert_eq!(names, vec!["linker:open", "linker:waiting", "link:success"]);
}
