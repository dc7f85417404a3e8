//! Portal state, navigation, and the store that keeps them in step with the mirror.

mod navigation;
mod state;

pub use navigation::{Navigation, NavigationAction};
pub use state::{PortalState, PostDraft, Transition};

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::db::MirrorStore;
use crate::errors::AppError;

/// The current portal state plus the mirror it is written through to.
///
/// Mutations hold the write lock across transition and save, so the mirror always matches
/// what readers see. A failed save leaves the published state untouched.
pub struct PortalStore {
    current: RwLock<PortalState>,
    mirror: Arc<dyn MirrorStore>,
}

impl PortalStore {
    /// Load the last saved state from `mirror`.
    pub async fn open(mirror: Arc<dyn MirrorStore>) -> Result<Self, AppError> {
        let state = mirror.load().await?;
        tracing::info!(
            posts = state.posts.len(),
            subjects = state.subjects.len(),
            board = state.board.len(),
            "Portal state loaded"
        );
        Ok(Self {
            current: RwLock::new(state),
            mirror,
        })
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> PortalState {
        self.current.read().await.clone()
    }

    /// Run `transition` on the current state and persist the outcome.
    ///
    /// Returns `None` when the transition ignored its input.
    pub async fn apply<T>(
        &self,
        transition: impl FnOnce(&PortalState) -> Result<Transition<T>, AppError>,
    ) -> Result<Option<T>, AppError> {
        let mut current = self.current.write().await;
        match transition(&*current)? {
            Transition::Ignored => Ok(None),
            Transition::Applied(next, value) => {
                self.mirror.save(&next).await?;
                *current = next;
                Ok(Some(value))
            }
        }
    }
}
