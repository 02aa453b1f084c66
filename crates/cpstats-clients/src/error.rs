use cpstats_core::Platform;
use thiserror::Error;

/// Coarse classification callers map to a response class.
///
/// `NotFound` is a 4xx-style rejection and never worth retrying. `Transient`
/// and `Parse` are 5xx-style; `Parse` is kept apart so markup drift on a
/// scraped page shows up separately from network trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Transient,
    Parse,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("username not found on {platform}")]
    NotFound { platform: Platform, username: String },

    #[error("{platform} API error: HTTP {status}")]
    UnexpectedStatus { platform: Platform, status: u16 },

    #[error("failed to fetch {platform} data, please try again later: {source}")]
    Http {
        platform: Platform,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected {platform} response for {context}: {source}")]
    Deserialize {
        platform: Platform,
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to scrape {platform} data, please try again later: {reason}")]
    Scrape { platform: Platform, reason: String },

    #[error("{platform} profile page no longer matches parse strategy {strategy}: {reason}")]
    Parse {
        platform: Platform,
        strategy: &'static str,
        reason: String,
    },

    #[error("invalid {platform} base URL \"{url}\": {reason}")]
    InvalidBaseUrl {
        platform: Platform,
        url: String,
        reason: String,
    },
}

impl ProfileError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProfileError::NotFound { .. } => ErrorKind::NotFound,
            ProfileError::Parse { .. } => ErrorKind::Parse,
            ProfileError::UnexpectedStatus { .. }
            | ProfileError::Http { .. }
            | ProfileError::Deserialize { .. }
            | ProfileError::Scrape { .. }
            | ProfileError::InvalidBaseUrl { .. } => ErrorKind::Transient,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            ProfileError::NotFound { platform, .. }
            | ProfileError::UnexpectedStatus { platform, .. }
            | ProfileError::Http { platform, .. }
            | ProfileError::Deserialize { platform, .. }
            | ProfileError::Scrape { platform, .. }
            | ProfileError::Parse { platform, .. }
            | ProfileError::InvalidBaseUrl { platform, .. } => *platform,
        }
    }
}
