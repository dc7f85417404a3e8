//! AI tutor endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{AskRequest, AskResponse, ConversationView};
use crate::AppState;

fn conversation_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Conversation {} not found", raw)))
}

/// POST /api/assistant/sessions - Open a conversation seeded with the greeting.
pub async fn open_conversation(State(state): State<AppState>) -> ApiResult<ConversationView> {
    success(state.assistant.open().await)
}

/// GET /api/assistant/sessions/:id - Transcript and waiting flag.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ConversationView> {
    success(state.assistant.get(conversation_id(&id)?).await?)
}

/// DELETE /api/assistant/sessions/:id - Discard a conversation.
pub async fn close_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.assistant.close(conversation_id(&id)?).await?;
    success(())
}

/// POST /api/assistant/sessions/:id/messages - Ask one question and wait for the reply.
pub async fn ask_assistant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AskRequest>,
) -> ApiResult<AskResponse> {
    let id = conversation_id(&id)?;
    success(state.assistant.ask(id, &request.text).await?)
}
