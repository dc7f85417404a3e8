//! Mirror store for the portal's collections.
//!
//! Posts, subjects and board messages are each kept as one JSON blob under a fixed key.
//! Every save rewrites all three blobs from the current in-memory state.

mod memory;
mod sqlite;

pub use memory::MemoryMirror;
pub use sqlite::{init_database, SqliteMirror};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::portal::PortalState;

pub const POSTS_KEY: &str = "supabase_posts_mirror";
pub const SUBJECTS_KEY: &str = "supabase_subjects_mirror";
pub const BOARD_KEY: &str = "supabase_chat_mirror";

/// A swappable home for the portal state.
#[async_trait]
pub trait MirrorStore: Send + Sync {
    /// Read the last saved state. Missing collections fall back to their defaults;
    /// a collection that is present but unreadable is an error.
    async fn load(&self) -> Result<PortalState, AppError>;

    /// Overwrite every collection with `state`.
    async fn save(&self, state: &PortalState) -> Result<(), AppError>;
}

/// Serialize the three collections as `(key, json)` pairs.
pub(crate) fn encode(state: &PortalState) -> Result<[(&'static str, String); 3], AppError> {
    Ok([
        (POSTS_KEY, serde_json::to_string(&state.posts)?),
        (SUBJECTS_KEY, serde_json::to_string(&state.subjects)?),
        (BOARD_KEY, serde_json::to_string(&state.board)?),
    ])
}

/// Rebuild the state from whatever blobs `lookup` finds.
pub(crate) fn decode(
    mut lookup: impl FnMut(&str) -> Option<String>,
) -> Result<PortalState, AppError> {
    let defaults = PortalState::default();
    Ok(PortalState {
        posts: decode_blob(POSTS_KEY, lookup(POSTS_KEY))?.unwrap_or(defaults.posts),
        subjects: decode_blob(SUBJECTS_KEY, lookup(SUBJECTS_KEY))?.unwrap_or(defaults.subjects),
        board: decode_blob(BOARD_KEY, lookup(BOARD_KEY))?.unwrap_or(defaults.board),
    })
}

fn decode_blob<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Result<Option<T>, AppError> {
    raw.map(|json| {
        serde_json::from_str(&json)
            .map_err(|e| AppError::Storage(format!("Mirror {} is corrupt: {}", key, e)))
    })
    .transpose()
}
