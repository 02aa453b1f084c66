//! Bulk refresh against real platform clients, a mock upstream, and the
//! JSON-file user store.

use std::sync::Arc;
use std::time::Duration;

use cpstats_clients::{CodeChefClient, CodeChefSettings, LeetCodeClient, PlatformClients};
use cpstats_core::{CodeChefProfile, LeetCodeProfile, ProblemsSolved};
use cpstats_sync::{BulkRefreshJob, FixedDelay, JsonFileDirectory, UserDirectory};
use serde_json::json;
use tempfile::tempdir;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn clients(server: &MockServer) -> PlatformClients {
    let leetcode = LeetCodeClient::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap();
    let codechef = CodeChefClient::new(CodeChefSettings {
        api_url: server.uri(),
        site_url: server.uri(),
        api_timeout: Duration::from_millis(300),
        scrape_timeout: Duration::from_secs(5),
        ..CodeChefSettings::default()
    })
    .unwrap();
    PlatformClients::new(Arc::new(leetcode), Arc::new(codechef))
}

#[tokio::test]
async fn nightly_run_refreshes_both_platforms_and_persists() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("referer", server.uri().as_str()))
        .and(body_partial_json(json!({ "variables": { "username": "alice_dev" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "matchedUser": {
                    "username": "alice_dev",
                    "profile": { "ranking": 250_000, "reputation": 12 },
                    "submitStats": {
                        "acSubmissionNum": [
                            { "difficulty": "All", "count": 16 },
                            { "difficulty": "Easy", "count": 10 },
                            { "difficulty": "Medium", "count": 5 },
                            { "difficulty": "Hard", "count": 1 }
                        ]
                    }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/handle/bob99"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/bob99"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="rating-number">1850</div>
               <div class="rating-ranks">Global Rank: 9001 Country Rank: 812</div>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().expect("tempdir");
    let store = Arc::new(JsonFileDirectory::new(dir.path().join("users.json")));
    let id = Uuid::new_v4();
    store.ensure_user(id).await.unwrap();
    let mut profiles = store.load_user(id).await.unwrap().unwrap().coding_profiles;
    profiles.leetcode = LeetCodeProfile::pending("alice_dev");
    profiles.codechef = CodeChefProfile::pending("bob99");
    store.save_profiles(id, &profiles).await.unwrap();

    let job = BulkRefreshJob::new(
        store.clone(),
        clients(&server),
        Arc::new(FixedDelay::new(Duration::ZERO)),
    );
    let outcome = job.trigger_manual_refresh().await.unwrap();

    assert_eq!(outcome.success_count, 2);
    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.total_users_processed, 1);

    let reopened = JsonFileDirectory::new(store.path());
    let saved = reopened.load_user(id).await.unwrap().unwrap().coding_profiles;
    assert_eq!(
        saved.leetcode.problems_solved,
        ProblemsSolved {
            easy: 10,
            medium: 5,
            hard: 1,
            total: 16,
        }
    );
    assert!(saved.leetcode.verified);
    assert_eq!(saved.codechef.stars, 3);
    assert_eq!(saved.codechef.rating, Some(1850));
    assert_eq!(saved.codechef.highest_rating, Some(1850));
    assert!(saved.codechef.last_updated.is_some());
}
