//! The outbound port to a text-generation service.

use async_trait::async_trait;

use crate::models::AssistantTurn;

/// Failure talking to the generation service. Never shown to students.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("No API key configured for the assistant")]
    MissingApiKey,
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Everything sent for one tutor reply.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_instruction: String,
    /// Running transcript, oldest first, ending with the new user turn
    pub transcript: Vec<AssistantTurn>,
    pub temperature: f32,
    pub top_p: f32,
}

#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Produce the reply text for `request`. An empty string means the service said nothing.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError>;
}
