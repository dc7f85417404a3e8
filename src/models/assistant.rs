//! Assistant transcript models matching the frontend Message interface.

use serde::{Deserialize, Serialize};

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One message in an AI tutor transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantTurn {
    pub role: Role,
    pub text: String,
}

impl AssistantTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Request body for a tutor question.
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub text: String,
}

/// Snapshot of one tutor conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub id: String,
    pub awaiting_response: bool,
    pub transcript: Vec<AssistantTurn>,
}

/// Result of one accepted or ignored submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    /// `None` when the submission was blank and nothing was sent
    pub reply: Option<AssistantTurn>,
    pub transcript: Vec<AssistantTurn>,
}
