//! HTTP client for LeetCode's public GraphQL endpoint.
//!
//! One request per username, no retries. Retry policy belongs to the caller;
//! the nightly bulk refresh is the implicit retry for scheduled runs.

use std::time::Duration;

use chrono::{DateTime, Utc};
use cpstats_core::{LeetCodeProfile, Platform, ProblemsSolved};
use reqwest::{Client, Url};
use serde_json::json;

use crate::error::ProfileError;
use crate::types::{DifficultyCount, GraphQlResponse, MatchedUser, MatchedUserData};

const DEFAULT_BASE_URL: &str = "https://leetcode.com";

const USER_PROFILE_QUERY: &str = r"
query userPublicProfile($username: String!) {
  matchedUser(username: $username) {
    username
    profile {
      ranking
      reputation
    }
    submitStats {
      acSubmissionNum {
        difficulty
        count
      }
    }
  }
}
";

/// Client for LeetCode's `matchedUser` GraphQL query.
///
/// Use [`LeetCodeClient::new`] for production or
/// [`LeetCodeClient::with_base_url`] to point at a mock server in tests.
pub struct LeetCodeClient {
    client: Client,
    endpoint: Url,
    referer: String,
}

impl LeetCodeClient {
    /// Creates a client pointed at `https://leetcode.com/graphql`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, ProfileError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Creates a client whose GraphQL endpoint is `{base_url}/graphql`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ProfileError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ProfileError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| ProfileError::Http {
                platform: Platform::LeetCode,
                source,
            })?;

        let invalid = |reason: String| ProfileError::InvalidBaseUrl {
            platform: Platform::LeetCode,
            url: base_url.to_owned(),
            reason,
        };
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        let endpoint = base.join("graphql").map_err(|e| invalid(e.to_string()))?;
        let referer = base.origin().ascii_serialization();

        Ok(Self {
            client,
            endpoint,
            referer,
        })
    }

    /// Fetches and normalizes one user's public statistics.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::NotFound`] if `matchedUser` is missing or `null`.
    /// - [`ProfileError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ProfileError::Http`] on network failure or timeout.
    /// - [`ProfileError::Deserialize`] if the body is not the expected JSON.
    pub async fn fetch_profile(&self, username: &str) -> Result<LeetCodeProfile, ProfileError> {
        let http = |source| ProfileError::Http {
            platform: Platform::LeetCode,
            source,
        };

        let body = json!({
            "query": USER_PROFILE_QUERY,
            "variables": { "username": username },
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::REFERER, &self.referer)
            .json(&body)
            .send()
            .await
            .map_err(http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::UnexpectedStatus {
                platform: Platform::LeetCode,
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(http)?;
        let parsed: GraphQlResponse<MatchedUserData> =
            serde_json::from_str(&text).map_err(|source| ProfileError::Deserialize {
                platform: Platform::LeetCode,
                context: format!("matchedUser(username={username})"),
                source,
            })?;

        let user = parsed
            .data
            .and_then(|d| d.matched_user)
            .ok_or_else(|| ProfileError::NotFound {
                platform: Platform::LeetCode,
                username: username.to_owned(),
            })?;

        tracing::debug!(username, "leetcode: matched user");
        Ok(normalize_matched_user(user, username, Utc::now()))
    }
}

/// Maps a `matchedUser` payload into the normalized profile shape.
pub(crate) fn normalize_matched_user(
    user: MatchedUser,
    requested: &str,
    fetched_at: DateTime<Utc>,
) -> LeetCodeProfile {
    let (rank, rating) = user
        .profile
        .map_or((None, None), |p| (positive(p.ranking), positive(p.reputation)));
    let problems_solved = user
        .submit_stats
        .map(|s| bucket_counts(&s.ac_submission_num))
        .unwrap_or_default();
    let username = user
        .username
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| requested.to_owned());

    LeetCodeProfile::fetched(username, rank, rating, problems_solved, fetched_at)
}

fn bucket_counts(counts: &[DifficultyCount]) -> ProblemsSolved {
    let mut solved = ProblemsSolved::default();
    for entry in counts {
        match entry.difficulty.as_str() {
            "Easy" => solved.easy = entry.count,
            "Medium" => solved.medium = entry.count,
            "Hard" => solved.hard = entry.count,
            "All" => solved.total = entry.count,
            _ => {}
        }
    }
    solved
}

fn positive(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v > 0)
}

#[cfg(test)]
#[path = "leetcode_test.rs"]
mod tests;
