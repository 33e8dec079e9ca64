//! Session façade integration tests: validation ordering, preview startup,
//! identity delegation.

use scenelink_core::{SceneError, Session, SessionConfig};
use scenelink_events::SessionEvent;
use scenelink_identity::Identity;
use scenelink_test_utils::{
    silent_linker, validation_log, MockProject, MockWorkspace, StubPreviewFactory,
};
use std::sync::Arc;
use std::time::Duration;

fn build(
    workspace: MockWorkspace,
    secret: Option<&str>,
    preview: Arc<StubPreviewFactory>,
) -> Session {
    Session::with_workspace(
        SessionConfig::new("/mock-working-dir").with_preview_port(8123),
        secret,
        Arc::new(workspace),
        preview,
        silent_linker(),
    )
    .unwrap()
}

#[tokio::test]
async fn preview_validates_projects_sequentially() {
    let log = validation_log();
    let workspace = MockWorkspace::with_projects(vec![
        Arc::new(MockProject::valid("alpha").with_log(Arc::clone(&log))),
        Arc::new(
            MockProject::valid("beta")
                .with_invalid_options()
                .with_log(Arc::clone(&log)),
        ),
    ]);
    let preview = StubPreviewFactory::new();
    let session = build(workspace, None, Arc::clone(&preview));

    let err = session.preview().await.unwrap_err();
    assert!(matches!(err, SceneError::Validation(_)));

    // Alpha's validations both completed before beta was touched, and the
    // server never started.
    let order = log.lock().unwrap().clone();
    assert_eq!(
        order,
        vec!["alpha:existing", "alpha:options", "beta:existing", "beta:options"]
    );
    assert_eq!(preview.started_port(), None);
}

#[tokio::test]
async fn preview_starts_on_the_configured_port() {
    let preview = StubPreviewFactory::new();
    let session = build(
        MockWorkspace::single(MockProject::valid("plaza")),
        None,
        Arc::clone(&preview),
    );
    let mut events = session.take_events().unwrap();

    session.preview().await.unwrap();
    assert_eq!(preview.started_port(), Some(8123));

    let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("relayed event")
        .expect("stream open");
    assert_eq!(event, SessionEvent::PreviewStarted { port: 8123 });
}

#[tokio::test]
async fn preview_propagates_transport_failure() {
    let preview = StubPreviewFactory::failing();
    let session = build(
        MockWorkspace::single(MockProject::valid("plaza")),
        None,
        preview,
    );

    let err = session.preview().await.unwrap_err();
    assert!(matches!(err, SceneError::Transport(_)));
}

#[tokio::test]
async fn signing_without_identity_is_a_hard_failure() {
    let session = build(
        MockWorkspace::single(MockProject::valid("plaza")),
        None,
        StubPreviewFactory::new(),
    );

    let err = session.get_address_and_signature("bafyroot").await.unwrap_err();
    assert!(err.to_string().contains("signing secret"));

    // Address retrieval follows the same policy
    let err = session.get_public_address().await.unwrap_err();
    assert!(matches!(err, SceneError::Identity(_)));
}

#[tokio::test]
async fn signing_with_identity_produces_matching_pair() {
    let secret = "a".repeat(64);
    let session = build(
        MockWorkspace::single(MockProject::valid("plaza")),
        Some(&secret),
        StubPreviewFactory::new(),
    );

    let expected = Identity::from_secret(&secret).unwrap();
    let pair = session.get_address_and_signature("bafyroot").await.unwrap();
    assert_eq!(pair.address, expected.derive_address());
    assert_eq!(pair.signature, expected.derive_signature("bafyroot"));
    assert_eq!(
        session.get_public_address().await.unwrap(),
        expected.derive_address()
    );
}

#[tokio::test]
async fn invalid_secret_fails_construction() {
    let result = Session::with_workspace(
        SessionConfig::new("/mock-working-dir"),
        Some("too-short"),
        Arc::new(MockWorkspace::single(MockProject::valid("plaza"))),
        StubPreviewFactory::new(),
        silent_linker(),
    );
    assert!(matches!(result, Err(SceneError::Identity(_))));
}

#[test]
#[should_panic(expected = "working directory is missing")]
fn empty_working_dir_is_caller_misuse() {
    let _ = Session::with_workspace(
        SessionConfig::new(""),
        None,
        Arc::new(MockWorkspace::empty()),
        StubPreviewFactory::new(),
        silent_linker(),
    );
}

#[tokio::test]
async fn event_stream_can_only_be_taken_once() {
    let session = build(
        MockWorkspace::single(MockProject::valid("plaza")),
        None,
        StubPreviewFactory::new(),
    );
    assert!(session.take_events().is_some());
    assert!(session.take_events().is_none());
}
