//! Client-local persistence of the session identifier.
//!
//! A single key holds the logged-in user's id. It is read once at startup,
//! written on successful login, and removed on logout.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::StorageError;

/// Name of the persisted key (and of the file backing it).
pub const SESSION_KEY: &str = "userId";

/// Persistent home for the raw session identifier.
///
/// Values are stored unvalidated; the controller decides whether a loaded
/// value is usable.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<String>, StorageError>;

    async fn store(&self, id: &str) -> Result<(), StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "userId")]
    user_id: String,
}

/// Stores the id as a small JSON document in a directory on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Storage rooted at `dir`; the directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SESSION_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let stored: StoredSession = serde_json::from_slice(&bytes)?;
                Ok(Some(stored.user_id))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, id: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec(&StoredSession {
            user_id: id.to_owned(),
        })?;
        // Write beside the target and rename so a crash never leaves a torn file.
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, body).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Non-persistent storage, used for `--ephemeral` runs and in tests.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    value: RwLock<Option<String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that starts out holding `id`.
    pub fn with_value(id: impl Into<String>) -> Self {
        Self {
            value: RwLock::new(Some(id.into())),
        }
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value.read().await.clone())
    }

    async fn store(&self, id: &str) -> Result<(), StorageError> {
        *self.value.write().await = Some(id.to_owned());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.value.write().await = None;
        Ok(())
    }
}
