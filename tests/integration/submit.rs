//! Wire contract of a single submission.

use crate::integration::mock_server::{refused_base_url, MockServerFixture, INFER_PATH};
use envenomation_client::{
    ClientConfig, FailureKind, InferenceClient, SpeciesMatch, StatusPolicy,
};
use mockito::Matcher;
use serde_json::json;

fn stonefish_and_jellyfish() -> serde_json::Value {
    json!([
        {
            "common_name": "Reef stonefish",
            "image": "/images/synanceia.jpg",
            "match_score": 212.0,
            "symptom": "excruciating localized pain",
            "onset_time": "immediate",
            "duration": "hours to days",
            "reference": "10.1016/j.toxicon.2010.01.001",
            "doi_url": "https://dx.doi.org/10.1016/j.toxicon.2010.01.001",
            "first_aid": "Immerse in hot water",
            "hospital_treatment": "Stonefish antivenom",
            "prognosis": "Good with treatment"
        },
        {
            "common_name": "Box jellyfish",
            "image": null,
            "match_score": 93.456,
            "symptom": "burning sensation",
            "onset_time": "seconds",
            "duration": null,
            "reference": null,
            "doi_url": null,
            "first_aid": null,
            "hospital_treatment": null,
            "prognosis": null
        }
    ])
}

#[tokio::test]
async fn test_every_query_sends_exactly_one_request_with_symptoms_body() {
    for query in ["", "tingling and numbness", "douleur \"brûlante\"\nœdème"] {
        let mut fixture = MockServerFixture::new().await;
        let mock = fixture.mock_infer(query, 200, "[]").await;

        let results = fixture.client().submit(query).await.unwrap();
        assert!(results.is_empty());
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_request_carries_correlation_id() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", INFER_PATH)
        .match_header(
            "x-request-id",
            Matcher::Regex(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}$".to_string()),
        )
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let (_, stats) = fixture.client().submit_with_stats("pain").await.unwrap();
    assert_eq!(stats.http_status, 200);
    assert_eq!(stats.request_id.len(), 36);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_well_formed_response_is_preserved_in_order() {
    let mut fixture = MockServerFixture::new().await;
    let body = stonefish_and_jellyfish().to_string();
    let _mock = fixture.mock_infer("pain", 200, &body).await;

    let results = fixture.client().submit("pain").await.unwrap();

    let mut stonefish = SpeciesMatch::new("Reef stonefish", 212.0)
        .with_image("/images/synanceia.jpg")
        .with_symptom("excruciating localized pain")
        .with_timeline("immediate", "hours to days")
        .with_doi_url("https://dx.doi.org/10.1016/j.toxicon.2010.01.001")
        .with_treatment(
            "Immerse in hot water",
            "Stonefish antivenom",
            "Good with treatment",
        );
    stonefish.reference = Some("10.1016/j.toxicon.2010.01.001".to_string());

    let mut jellyfish = SpeciesMatch::new("Box jellyfish", 93.456).with_symptom("burning sensation");
    jellyfish.onset_time = Some("seconds".to_string());

    assert_eq!(results.matches(), &[stonefish, jellyfish][..]);
    assert!(results.rejected().is_empty());
}

#[tokio::test]
async fn test_malformed_entries_are_dropped_and_counted() {
    let mut fixture = MockServerFixture::new().await;
    let body = json!([
        {"common_name": "Lionfish", "match_score": 80.0},
        {"common_name": "Sea snake"},
        42
    ])
    .to_string();
    let _mock = fixture.mock_infer("swelling", 200, &body).await;

    let (results, stats) = fixture.client().submit_with_stats("swelling").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results.matches()[0].common_name, "Lionfish");
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.rejected, 2);
}

#[tokio::test]
async fn test_bad_request_surfaces_service_message() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_infer("", 400, r#"{"error": "Missing symptoms in request"}"#)
        .await;

    let err = fixture.client().submit("").await.unwrap_err();
    assert!(err.is_inference_failure());
    assert_eq!(err.failure_kind(), Some(FailureKind::Status));
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("Missing symptoms in request"));
}

#[tokio::test]
async fn test_server_error_without_json_body() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_infer("pain", 500, "Internal Server Error").await;

    let err = fixture.client().submit("pain").await.unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Status));
    assert!(err.to_string().contains("HTTP 500"));
}

#[tokio::test]
async fn test_ignore_policy_decodes_body_whatever_the_status() {
    let mut fixture = MockServerFixture::new().await;
    let body = json!([{"common_name": "Fire coral", "match_score": 33.3}]).to_string();
    let _mock = fixture.mock_infer("itching", 503, &body).await;

    let results = fixture
        .client_with(StatusPolicy::Ignore)
        .submit("itching")
        .await
        .unwrap();
    assert_eq!(results.len(), 1);

    // An error object is still not an array.
    let _mock = fixture
        .mock_infer("", 400, r#"{"error": "Missing symptoms in request"}"#)
        .await;
    let err = fixture
        .client_with(StatusPolicy::Ignore)
        .submit("")
        .await
        .unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Decode));
}

#[tokio::test]
async fn test_non_json_body_is_decode_failure() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_infer("pain", 200, "<html><body>maintenance</body></html>")
        .await;

    let err = fixture.client().submit("pain").await.unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::Decode));
}

#[tokio::test]
async fn test_connection_refused_is_network_failure() {
    let client = InferenceClient::new(ClientConfig::default().with_base_url(refused_base_url()))
        .unwrap();
    let err = client.submit("pain").await.unwrap_err();
    assert!(err.is_inference_failure());
    assert_eq!(err.failure_kind(), Some(FailureKind::Network));
    assert!(err.context().request_id.is_some());
}

#[tokio::test]
async fn test_concurrent_submissions_on_one_client_are_independent() {
    let mut fixture = MockServerFixture::new().await;
    let queries = ["welts", "vertigo", "ptosis"];
    let mut mocks = Vec::new();
    for q in queries {
        let body = json!([{"common_name": format!("match for {}", q), "match_score": 10.0}]);
        mocks.push(fixture.mock_infer(q, 200, &body.to_string()).await);
    }

    let client = fixture.client();
    let results = futures::future::join_all(queries.iter().map(|q| {
        let client = client.clone();
        async move { client.submit(*q).await }
    }))
    .await;

    for (q, r) in queries.iter().zip(results) {
        let set = r.unwrap();
        assert_eq!(set.matches()[0].common_name, format!("match for {}", q));
    }
    for m in mocks {
        m.assert_async().await;
    }
}
