use async_trait::async_trait;
use cpstats_core::{CodingProfiles, PlatformProfile, UserRecord};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DirectoryError, UserDirectory};

/// Insertion-ordered in-process store.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: RwLock<Vec<UserRecord>>,
}

impl MemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Adds `user`, replacing any record with the same id.
    pub async fn insert(&self, user: UserRecord) {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
    }

    pub async fn snapshot(&self) -> Vec<UserRecord> {
        self.users.read().await.clone()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn users_with_profiles(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| u.coding_profiles.has_any_username())
            .cloned()
            .collect())
    }

    async fn load_user(&self, id: Uuid) -> Result<Option<UserRecord>, DirectoryError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn save_profiles(
        &self,
        id: Uuid,
        profiles: &CodingProfiles,
    ) -> Result<(), DirectoryError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DirectoryError::UnknownUser(id))?;
        user.coding_profiles = profiles.clone();
        Ok(())
    }

    async fn save_platform_profiles(
        &self,
        id: Uuid,
        updates: &[PlatformProfile],
    ) -> Result<(), DirectoryError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DirectoryError::UnknownUser(id))?;
        for profile in updates {
            user.coding_profiles.set(profile.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cpstats_core::{CodeChefProfile, LeetCodeProfile, Platform};

    use super::*;

    fn user_with(leetcode: Option<&str>, codechef: Option<&str>) -> UserRecord {
        let mut user = UserRecord::new(Uuid::new_v4());
        if let Some(name) = leetcode {
            user.coding_profiles.leetcode = LeetCodeProfile::pending(name);
        }
        if let Some(name) = codechef {
            user.coding_profiles.codechef = CodeChefProfile::pending(name);
        }
        user
    }

    #[tokio::test]
    async fn lists_only_users_with_a_username_in_order() {
        let a = user_with(Some("a"), None);
        let none = user_with(None, None);
        let b = user_with(None, Some("b"));
        let dir = MemoryDirectory::with_users(vec![a.clone(), none, b.clone()]);

        let listed = dir.users_with_profiles().await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn save_replaces_profiles() {
        let user = user_with(Some("a"), None);
        let dir = MemoryDirectory::with_users(vec![user.clone()]);

        let mut profiles = user.coding_profiles.clone();
        profiles.codechef = CodeChefProfile::pending("c");
        dir.save_profiles(user.id, &profiles).await.unwrap();

        let loaded = dir.load_user(user.id).await.unwrap().unwrap();
        assert_eq!(loaded.coding_profiles, profiles);
    }

    #[tokio::test]
    async fn save_for_unknown_user_fails() {
        let dir = MemoryDirectory::new();
        let id = Uuid::new_v4();
        let err = dir
            .save_profiles(id, &CodingProfiles::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::UnknownUser(u) if u == id));
    }

    #[tokio::test]
    async fn platform_save_leaves_other_slot_alone() {
        let user = user_with(Some("a"), None);
        let dir = MemoryDirectory::with_users(vec![user.clone()]);

        let mut edited = user.coding_profiles.clone();
        edited.codechef = CodeChefProfile::pending("c");
        dir.save_profiles(user.id, &edited).await.unwrap();

        let refreshed = LeetCodeProfile {
            verified: true,
            ..LeetCodeProfile::pending("a")
        };
        dir.save_platform_profiles(user.id, &[refreshed.clone().into()])
            .await
            .unwrap();

        let loaded = dir.load_user(user.id).await.unwrap().unwrap();
        assert_eq!(loaded.coding_profiles.leetcode, refreshed);
        assert_eq!(loaded.coding_profiles.username(Platform::CodeChef), Some("c"));
    }

    #[tokio::test]
    async fn insert_replaces_existing_record() {
        let mut user = user_with(Some("a"), None);
        let dir = MemoryDirectory::new();
        dir.insert(user.clone()).await;
        user.coding_profiles.leetcode = LeetCodeProfile::pending("renamed");
        dir.insert(user.clone()).await;

        let all = dir.snapshot().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], user);
    }
}
