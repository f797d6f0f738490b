//! Session behaviour over the real HTTP client.

use crate::integration::mock_server::{refused_base_url, MockServerFixture};
use envenomation_client::{
    ClientConfig, FailureKind, InferenceClient, InferenceSession, SessionState, SubmitOutcome,
};
use serde_json::json;

#[tokio::test]
async fn test_failed_submission_keeps_previous_results() {
    let mut fixture = MockServerFixture::new().await;
    let first = json!([
        {"common_name": "Blue-ringed octopus", "match_score": 150.25},
        {"common_name": "Cone snail", "match_score": 120.0}
    ])
    .to_string();
    let _ok = fixture.mock_infer("paralysis", 200, &first).await;
    let _down = fixture.mock_infer("numbness", 503, "Service Unavailable").await;

    let session = InferenceSession::from_client(fixture.client());

    let outcome = session.submit("paralysis").await.unwrap();
    assert!(outcome.is_applied());
    let shown = session.results();
    assert_eq!(shown.len(), 2);

    let err = session.submit("numbness").await.unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Status));

    let snap = session.snapshot();
    assert_eq!(snap.state, SessionState::Idle);
    assert_eq!(snap.generation, 1);
    assert_eq!(*snap.results, *shown);
    assert_eq!(snap.last_error.and_then(|e| e.status()), Some(503));
}

#[tokio::test]
async fn test_network_failure_does_not_crash_and_keeps_empty_results() {
    let client = InferenceClient::new(ClientConfig::default().with_base_url(refused_base_url()))
        .unwrap();
    let session = InferenceSession::from_client(client);

    let err = session.submit("vomiting").await.unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Network));
    assert!(session.results().is_empty());
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.last_error().is_some());
}

#[tokio::test]
async fn test_success_after_failure_clears_error() {
    let mut fixture = MockServerFixture::new().await;
    let _bad = fixture.mock_infer("a", 200, "not json").await;
    let _good = fixture
        .mock_infer("b", 200, &json!([{"common_name": "Stingray", "match_score": 61.0}]).to_string())
        .await;

    let session = InferenceSession::from_client(fixture.client());
    assert!(session.submit("a").await.is_err());
    assert!(session.last_error().is_some());

    match session.submit("b").await.unwrap() {
        SubmitOutcome::Applied(results) => assert_eq!(results.matches()[0].common_name, "Stingray"),
        other => panic!("expected applied outcome, got {:?}", other),
    }
    assert!(session.last_error().is_none());
}
