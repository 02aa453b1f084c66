//! Wire types for the two JSON upstreams.
//!
//! ## LeetCode GraphQL (`POST /graphql`)
//!
//! A missing user is **not** an HTTP error: the endpoint answers 200 with
//! `{"data": {"matchedUser": null}, "errors": [...]}`. `data` itself may be
//! `null` when the query is rejected, so both levels are optional.
//!
//! `acSubmissionNum` carries one entry per difficulty label, observed as
//! `"All"`, `"Easy"`, `"Medium"`, `"Hard"`. The `"All"` entry can exceed the sum
//! of the other three, so it is read rather than recomputed.
//!
//! `profile.ranking` and `profile.reputation` are `0` for fresh accounts; both
//! are normalized to absent.
//!
//! ## CodeChef mirror (`GET /handle/{username}`)
//!
//! Community-run, so the shape drifts. Observed variations:
//! - the handle arrives as `username` on some deployments and `handle` on others;
//! - numeric fields are sometimes JSON numbers, sometimes numeric strings,
//!   and `0` or `"Inactive"` for unrated users;
//! - an unknown handle yields `{"success": false}` with HTTP 200.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUserData {
    #[serde(default)]
    pub matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub profile: Option<LeetCodeUserProfile>,
    #[serde(default)]
    pub submit_stats: Option<SubmitStats>,
}

#[derive(Debug, Deserialize)]
pub struct LeetCodeUserProfile {
    #[serde(default)]
    pub ranking: Option<i64>,
    #[serde(default)]
    pub reputation: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStats {
    #[serde(default)]
    pub ac_submission_num: Vec<DifficultyCount>,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyCount {
    pub difficulty: String,
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChefMirrorResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub current_rating: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub highest_rating: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub global_rank: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub country_rank: Option<i64>,
}

/// Accepts a JSON number, a numeric string, or anything else (as `None`).
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}
