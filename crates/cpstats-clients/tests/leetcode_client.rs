//! Integration tests for `LeetCodeClient` using wiremock HTTP mocks.

use std::time::Duration;

use cpstats_clients::{ErrorKind, LeetCodeClient, ProfileError};
use cpstats_core::ProblemsSolved;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> LeetCodeClient {
    LeetCodeClient::with_base_url(base_url, Duration::from_secs(5))
        .expect("client construction should not fail")
}

fn matched_user_body(username: &str) -> serde_json::Value {
    json!({
        "data": {
            "matchedUser": {
                "username": username,
                "profile": { "ranking": 183_245, "reputation": 7 },
                "submitStats": {
                    "acSubmissionNum": [
                        { "difficulty": "All", "count": 16, "submissions": 40 },
                        { "difficulty": "Easy", "count": 10, "submissions": 20 },
                        { "difficulty": "Medium", "count": 5, "submissions": 15 },
                        { "difficulty": "Hard", "count": 1, "submissions": 5 }
                    ]
                }
            }
        }
    })
}

#[tokio::test]
async fn fetch_profile_maps_difficulty_buckets() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("referer", server.uri().as_str()))
        .and(body_partial_json(json!({ "variables": { "username": "alice_dev" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(matched_user_body("alice_dev")))
        .expect(1)
        .mount(&server)
        .await;

    let profile = test_client(&server.uri())
        .fetch_profile("alice_dev")
        .await
        .expect("should fetch profile");

    assert_eq!(profile.username.as_deref(), Some("alice_dev"));
    assert_eq!(
        profile.problems_solved,
        ProblemsSolved {
            easy: 10,
            medium: 5,
            hard: 1,
            total: 16
        }
    );
    assert_eq!(profile.rank, Some(183_245));
    assert_eq!(profile.rating, Some(7));
    assert!(profile.verified);
    assert!(profile.last_updated.is_some());
}

#[tokio::test]
async fn null_matched_user_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "matchedUser": null },
            "errors": [{ "message": "That user does not exist." }]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_profile("definitely_not_a_real_user")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "username not found on leetcode");
}

#[tokio::test]
async fn null_data_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_profile("ghost")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn non_2xx_is_transient_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_profile("alice_dev")
        .await
        .unwrap_err();

    assert!(
        matches!(err, ProfileError::UnexpectedStatus { status: 429, .. }),
        "expected UnexpectedStatus(429), got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Transient);
}

#[tokio::test]
async fn garbage_body_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_profile("alice_dev")
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::Deserialize { .. }));
    assert_eq!(err.kind(), ErrorKind::Transient);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(matched_user_body("alice_dev"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = LeetCodeClient::with_base_url(&server.uri(), Duration::from_millis(200))
        .expect("client construction should not fail");
    let err = client.fetch_profile("alice_dev").await.unwrap_err();

    assert!(matches!(err, ProfileError::Http { .. }), "got: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Transient);
}

#[tokio::test]
async fn repeated_fetches_differ_only_in_timestamp() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(matched_user_body("alice_dev")))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let first = client.fetch_profile("alice_dev").await.unwrap();
    let mut second = client.fetch_profile("alice_dev").await.unwrap();

    assert!(second.last_updated >= first.last_updated);
    second.last_updated = first.last_updated;
    assert_eq!(first, second);
}
