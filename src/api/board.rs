//! Message board API endpoints.

use axum::{extract::State, Json};

use super::{now, success, ApiResult};
use crate::models::{BoardMessage, SendBoardMessageRequest};
use crate::AppState;

/// GET /api/board/messages - All board messages in posting order.
pub async fn list_board_messages(State(state): State<AppState>) -> ApiResult<Vec<BoardMessage>> {
    success(state.portal.snapshot().await.board)
}

/// POST /api/board/messages - Post to the board. Blank sender or text is ignored.
pub async fn send_board_message(
    State(state): State<AppState>,
    Json(request): Json<SendBoardMessageRequest>,
) -> ApiResult<Option<BoardMessage>> {
    let now = now();
    let message = state
        .portal
        .apply(|current| Ok(current.post_board_message(&request, now)))
        .await?;

    if let Some(message) = &message {
        tracing::info!(id = %message.id, "Board message posted");
    }
    success(message)
}
