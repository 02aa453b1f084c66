//! The user store boundary. This crate never talks to a database directly;
//! it only lists eligible users and loads or saves one user's profiles.

mod json_file;
mod memory;

use async_trait::async_trait;
use cpstats_core::{CodingProfiles, PlatformProfile, UserRecord};
use thiserror::Error;
use uuid::Uuid;

pub use json_file::JsonFileDirectory;
pub use memory::MemoryDirectory;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("I/O error on user store {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("user store {path} is not valid JSON: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode user store {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("user {0} does not exist")]
    UnknownUser(Uuid),

    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Users with at least one configured platform username, in the store's
    /// stable order.
    async fn users_with_profiles(&self) -> Result<Vec<UserRecord>, DirectoryError>;

    async fn load_user(&self, id: Uuid) -> Result<Option<UserRecord>, DirectoryError>;

    /// Replaces the user's `codingProfiles` attribute.
    ///
    /// Returns [`DirectoryError::UnknownUser`] if `id` is not in the store.
    async fn save_profiles(&self, id: Uuid, profiles: &CodingProfiles)
        -> Result<(), DirectoryError>;

    /// Overwrites only the platform slots in `updates`, against the record
    /// as it is stored at write time. Other slots keep whatever concurrent
    /// writers put there.
    ///
    /// Returns [`DirectoryError::UnknownUser`] if `id` is not in the store.
    async fn save_platform_profiles(
        &self,
        id: Uuid,
        updates: &[PlatformProfile],
    ) -> Result<(), DirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<i64>("not a number").unwrap_err()
    }

    #[test]
    fn encode_failure_is_not_reported_as_corruption() {
        let encode = DirectoryError::Serialize {
            path: "users.json".to_string(),
            source: json_error(),
        };
        let corrupt = DirectoryError::Corrupt {
            path: "users.json".to_string(),
            source: json_error(),
        };

        assert!(encode.to_string().starts_with("failed to encode user store users.json"));
        assert!(!encode.to_string().contains("not valid JSON"));
        assert!(corrupt.to_string().contains("not valid JSON"));
    }
}
