//! Normalized per-platform statistics and the `codingProfiles` attribute they
//! live under on a user record.
//!
//! A profile moves through three states:
//!
//! | state | `username` | `verified` | `last_updated` |
//! |---|---|---|---|
//! | not configured | `None` | `false` | `None` |
//! | pending first fetch | `Some` | `false` | `None` |
//! | fetched | `Some` | `true` | `Some` |
//!
//! `last_updated` is set exactly when `verified` is; the constructors below are
//! the only places that flip either field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Platform;

/// Accepted submission counts by difficulty bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemsSolved {
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
    /// LeetCode's own "All" figure, not the sum of the three buckets.
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeetCodeProfile {
    pub username: Option<String>,
    /// Global contest ranking.
    pub rank: Option<i64>,
    /// LeetCode reputation score.
    pub rating: Option<i64>,
    pub problems_solved: ProblemsSolved,
    pub last_updated: Option<DateTime<Utc>>,
    pub verified: bool,
}

impl LeetCodeProfile {
    /// A configured handle that has not been fetched successfully yet.
    #[must_use]
    pub fn pending(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    /// A profile produced by a successful fetch at `fetched_at`.
    #[must_use]
    pub fn fetched(
        username: impl Into<String>,
        rank: Option<i64>,
        rating: Option<i64>,
        problems_solved: ProblemsSolved,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            rank,
            rating,
            problems_solved,
            last_updated: Some(fetched_at),
            verified: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeChefProfile {
    pub username: Option<String>,
    /// 0 to 7, derived from `rating`.
    pub stars: u8,
    pub rating: Option<i64>,
    pub highest_rating: Option<i64>,
    pub global_rank: Option<i64>,
    pub country_rank: Option<i64>,
    pub last_updated: Option<DateTime<Utc>>,
    pub verified: bool,
}

impl CodeChefProfile {
    /// A configured handle that has not been fetched successfully yet.
    #[must_use]
    pub fn pending(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }
}

/// One platform's profile, tagged with the platform it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum PlatformProfile {
    LeetCode(LeetCodeProfile),
    CodeChef(CodeChefProfile),
}

impl PlatformProfile {
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            PlatformProfile::LeetCode(_) => Platform::LeetCode,
            PlatformProfile::CodeChef(_) => Platform::CodeChef,
        }
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            PlatformProfile::LeetCode(p) => p.username.as_deref(),
            PlatformProfile::CodeChef(p) => p.username.as_deref(),
        }
    }

    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        match self {
            PlatformProfile::LeetCode(p) => p.last_updated,
            PlatformProfile::CodeChef(p) => p.last_updated,
        }
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        match self {
            PlatformProfile::LeetCode(p) => p.verified,
            PlatformProfile::CodeChef(p) => p.verified,
        }
    }
}

impl From<LeetCodeProfile> for PlatformProfile {
    fn from(profile: LeetCodeProfile) -> Self {
        PlatformProfile::LeetCode(profile)
    }
}

impl From<CodeChefProfile> for PlatformProfile {
    fn from(profile: CodeChefProfile) -> Self {
        PlatformProfile::CodeChef(profile)
    }
}

/// The `codingProfiles` attribute of a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodingProfiles {
    pub leetcode: LeetCodeProfile,
    pub codechef: CodeChefProfile,
}

impl CodingProfiles {
    /// The configured remote handle for `platform`, ignoring blank strings.
    #[must_use]
    pub fn username(&self, platform: Platform) -> Option<&str> {
        let username = match platform {
            Platform::LeetCode => self.leetcode.username.as_deref(),
            Platform::CodeChef => self.codechef.username.as_deref(),
        };
        username.filter(|u| !u.trim().is_empty())
    }

    #[must_use]
    pub fn has_any_username(&self) -> bool {
        Platform::ALL.iter().any(|p| self.username(*p).is_some())
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> PlatformProfile {
        match platform {
            Platform::LeetCode => PlatformProfile::LeetCode(self.leetcode.clone()),
            Platform::CodeChef => PlatformProfile::CodeChef(self.codechef.clone()),
        }
    }

    /// Overwrites the slot matching the profile's platform.
    pub fn set(&mut self, profile: PlatformProfile) {
        match profile {
            PlatformProfile::LeetCode(p) => self.leetcode = p,
            PlatformProfile::CodeChef(p) => self.codechef = p,
        }
    }

    /// Resets `platform` to the not-configured state.
    pub fn clear(&mut self, platform: Platform) {
        match platform {
            Platform::LeetCode => self.leetcode = LeetCodeProfile::default(),
            Platform::CodeChef => self.codechef = CodeChefProfile::default(),
        }
    }
}

/// The slice of an externally owned user entity this system reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    #[serde(default)]
    pub coding_profiles: CodingProfiles,
}

impl UserRecord {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            coding_profiles: CodingProfiles::default(),
        }
    }
}

#[cfg(test)]
#[path = "profiles_test.rs"]
mod tests;
