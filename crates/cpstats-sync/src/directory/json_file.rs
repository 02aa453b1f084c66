use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cpstats_core::{CodingProfiles, PlatformProfile, UserRecord};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{DirectoryError, UserDirectory};

/// User records kept as a pretty-printed JSON array in a single file.
///
/// A missing file reads as an empty store. Every write replaces the whole
/// file through a temp file and rename, so a crash never leaves a torn array.
#[derive(Debug)]
pub struct JsonFileDirectory {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileDirectory {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the record for `id`, creating an empty one if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the file cannot be read or written.
    pub async fn ensure_user(&self, id: Uuid) -> Result<UserRecord, DirectoryError> {
        let _guard = self.lock.lock().await;
        let mut users = self.read_all().await?;
        if let Some(existing) = users.iter().find(|u| u.id == id) {
            return Ok(existing.clone());
        }
        let user = UserRecord::new(id);
        users.push(user.clone());
        self.write_all(&users).await?;
        tracing::info!(user_id = %id, path = %self.path.display(), "directory: created user");
        Ok(user)
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn io_error(&self, source: std::io::Error) -> DirectoryError {
        DirectoryError::Io {
            path: self.display_path(),
            source,
        }
    }

    async fn read_all(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|source| DirectoryError::Corrupt {
            path: self.display_path(),
            source,
        })
    }

    async fn write_all(&self, users: &[UserRecord]) -> Result<(), DirectoryError> {
        let mut body = serde_json::to_vec_pretty(users).map_err(|source| {
            DirectoryError::Serialize {
                path: self.display_path(),
                source,
            }
        })?;
        body.push(b'\n');

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .await
            .map_err(|e| self.io_error(e))?;

        let temp_path = parent.join(format!(".users.{}.tmp", Uuid::new_v4()));
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(&body).await.map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(self.io_error(e));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for JsonFileDirectory {
    async fn users_with_profiles(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let _guard = self.lock.lock().await;
        let users = self.read_all().await?;
        Ok(users
            .into_iter()
            .filter(|u| u.coding_profiles.has_any_username())
            .collect())
    }

    async fn load_user(&self, id: Uuid) -> Result<Option<UserRecord>, DirectoryError> {
        let _guard = self.lock.lock().await;
        let users = self.read_all().await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    async fn save_profiles(
        &self,
        id: Uuid,
        profiles: &CodingProfiles,
    ) -> Result<(), DirectoryError> {
        let _guard = self.lock.lock().await;
        let mut users = self.read_all().await?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DirectoryError::UnknownUser(id))?;
        user.coding_profiles = profiles.clone();
        self.write_all(&users).await
    }

    async fn save_platform_profiles(
        &self,
        id: Uuid,
        updates: &[PlatformProfile],
    ) -> Result<(), DirectoryError> {
        let _guard = self.lock.lock().await;
        let mut users = self.read_all().await?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DirectoryError::UnknownUser(id))?;
        for profile in updates {
            user.coding_profiles.set(profile.clone());
        }
        self.write_all(&users).await
    }
}
