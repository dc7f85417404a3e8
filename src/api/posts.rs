//! Post API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{now, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreatePostRequest, PageId, Post};
use crate::portal::PostDraft;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PostsQuery {
    pub category: Option<String>,
}

/// GET /api/posts - List posts, newest first, optionally for one category.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> ApiResult<Vec<Post>> {
    let snapshot = state.portal.snapshot().await;
    let posts = match query.category.as_deref() {
        None => snapshot.posts,
        Some(raw) => {
            let category = PageId::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {}", raw)))?;
            snapshot.posts_in(category).cloned().collect()
        }
    };
    success(posts)
}

/// POST /api/posts - Publish a post on a feed page.
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<Option<Post>> {
    let author = state.config.author_name.clone();
    let now = now();
    let post = state
        .portal
        .apply(|current| {
            current.add_post(
                PostDraft {
                    request: &request,
                    author: &author,
                },
                now,
            )
        })
        .await?;

    match &post {
        Some(post) => tracing::info!(id = %post.id, category = %post.category, "Post published"),
        None => tracing::debug!("Blank post ignored"),
    }
    success(post)
}

/// DELETE /api/posts/:id - Remove a post.
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.portal.apply(|current| current.remove_post(&id)).await?;
    tracing::info!(%id, "Post deleted");
    success(())
}
