use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::{SessionKey, SessionStore};
use crate::domain::DomainError;

/// Process-local [`SessionStore`]; nothing survives a restart.
pub struct InMemorySessionStore {
    entries: Arc<Mutex<HashMap<SessionKey, String>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, key: SessionKey) -> Result<Option<String>, DomainError> {
        Ok(self.entries.lock().await.get(&key).cloned())
    }

    async fn save(&self, key: SessionKey, value: &str) -> Result<(), DomainError> {
        self.entries.lock().await.insert(key, value.to_string());
        Ok(())
    }

    async fn clear(&self, key: SessionKey) -> Result<(), DomainError> {
        self.entries.lock().await.remove(&key);
        Ok(())
    }
}
