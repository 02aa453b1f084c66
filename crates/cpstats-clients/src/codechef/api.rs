use chrono::{DateTime, Utc};
use cpstats_core::{CodeChefProfile, Platform};

use crate::error::ProfileError;
use crate::stars::calculate_stars;
use crate::types::CodeChefMirrorResponse;

/// Maps a mirror response into the normalized profile.
///
/// Zero ratings and ranks mean "unrated" on the mirror and become `None`.
pub(super) fn normalize_mirror_response(
    response: CodeChefMirrorResponse,
    requested: &str,
    fetched_at: DateTime<Utc>,
) -> Result<CodeChefProfile, ProfileError> {
    if !response.success {
        return Err(ProfileError::NotFound {
            platform: Platform::CodeChef,
            username: requested.to_owned(),
        });
    }

    let rating = positive(response.current_rating);
    let username = response
        .username
        .or(response.handle)
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| requested.to_owned());

    Ok(CodeChefProfile {
        username: Some(username),
        stars: calculate_stars(rating.unwrap_or(0)),
        rating,
        highest_rating: positive(response.highest_rating),
        global_rank: positive(response.global_rank),
        country_rank: positive(response.country_rank),
        last_updated: Some(fetched_at),
        verified: true,
    })
}

fn positive(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v > 0)
}
