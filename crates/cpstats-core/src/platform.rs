use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An external competitive-programming site whose statistics are mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LeetCode,
    CodeChef,
}

impl Platform {
    /// Every supported platform, in the order the bulk refresh visits them.
    pub const ALL: [Platform; 2] = [Platform::LeetCode, Platform::CodeChef];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::LeetCode => "leetcode",
            Platform::CodeChef => "codechef",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid platform \"{0}\": must be \"leetcode\" or \"codechef\"")]
pub struct InvalidPlatform(pub String);

impl FromStr for Platform {
    type Err = InvalidPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leetcode" => Ok(Platform::LeetCode),
            "codechef" => Ok(Platform::CodeChef),
            _ => Err(InvalidPlatform(s.to_string())),
        }
    }
}
