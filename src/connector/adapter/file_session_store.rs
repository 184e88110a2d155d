use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::application::{SessionKey, SessionStore};
use crate::domain::DomainError;

const SESSION_FILE: &str = "session.json";

/// [`SessionStore`] backed by one JSON object on disk, keyed by the storage
/// key names (`mrBetterBoss_apiKey`, `mrBetterBoss_settings`).
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename. On unix the file is private to its owner. An unreadable file is
/// treated as empty.
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SESSION_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, DomainError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {e}", self.path.display());
                Ok(BTreeMap::new())
            }
        }
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        #[cfg(unix)]
        restrict_to_owner(&tmp).await?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DomainError::storage(format!("failed to replace session file: {e}")))?;
        Ok(())
    }
}

/// The file holds the raw API key: owner read/write only.
#[cfg(unix)]
async fn restrict_to_owner(path: &Path) -> Result<(), DomainError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, key: SessionKey) -> Result<Option<String>, DomainError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.remove(key.as_str()))
    }

    async fn save(&self, key: SessionKey, value: &str) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.as_str().to_string(), value.to_string());
        self.write_entries(&entries).await?;
        debug!("Saved {} to {}", key.as_str(), self.path.display());
        Ok(())
    }

    async fn clear(&self, key: SessionKey) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key.as_str()).is_some() {
            self.write_entries(&entries).await?;
            debug!("Cleared {} from {}", key.as_str(), self.path.display());
        }
        Ok(())
    }
}
