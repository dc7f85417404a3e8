//! Process-local mirror store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{decode, encode, MirrorStore};
use crate::errors::AppError;
use crate::portal::PortalState;

/// Keeps the mirror blobs in a map. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryMirror {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw blob, as if an earlier run had written it.
    #[cfg(test)]
    pub async fn put_raw(&self, key: &str, value: &str) {
        self.blobs
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
    }

    #[cfg(test)]
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.blobs.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl MirrorStore for MemoryMirror {
    async fn load(&self) -> Result<PortalState, AppError> {
        let blobs = self.blobs.lock().await;
        decode(|key| blobs.get(key).cloned())
    }

    async fn save(&self, state: &PortalState) -> Result<(), AppError> {
        let encoded = encode(state)?;
        let mut blobs = self.blobs.lock().await;
        for (key, value) in encoded {
            blobs.insert(key.to_string(), value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{BOARD_KEY, POSTS_KEY};

    #[tokio::test]
    async fn test_empty_store_loads_defaults() {
        let store = MemoryMirror::new();
        assert_eq!(store.load().await.unwrap(), PortalState::default());
    }

    #[tokio::test]
    async fn test_save_writes_every_collection() {
        let store = MemoryMirror::new();
        store.save(&PortalState::default()).await.unwrap();
        assert_eq!(store.raw(POSTS_KEY).await.as_deref(), Some("[]"));
        assert_eq!(store.raw(BOARD_KEY).await.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_loads_blob_written_by_browser_frontend() {
        let store = MemoryMirror::new();
        store
            .put_raw(
                "supabase_posts_mirror",
                r#"[{"id":"1767225600000","category":"tcc","title":"Banca","content":"Sala 4","date":"05/01/2026","author":"Prof. Téo"}]"#,
            )
            .await;
        store
            .put_raw(
                "supabase_chat_mirror",
                r#"[{"id":"1","sender":"Ana","text":"Oi","time":"10:15"}]"#,
            )
            .await;

        let state = store.load().await.unwrap();
        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.posts[0].title, "Banca");
        assert!(state.posts[0].image_url.is_none());
        assert_eq!(state.board[0].sender, "Ana");
        assert_eq!(state.subjects.len(), 5);
    }

    #[tokio::test]
    async fn test_corrupt_blob_fails_load() {
        let store = MemoryMirror::new();
        store.put_raw(POSTS_KEY, "[{\"id\":").await;
        assert!(store.load().await.is_err());
    }
}
