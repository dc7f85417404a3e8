//! AI tutor: conversations, the generation port, and the Gemini adapter.
//!
//! Transcripts live only in memory. Each conversation allows one outstanding request;
//! whatever happens to that request, exactly one model turn is appended.

mod backend;
mod conversation;
mod gemini;
mod instruction;

pub use backend::{AssistantBackend, AssistantError, GenerationRequest};
pub use conversation::{Conversation, Submission};
pub use gemini::GeminiBackend;
pub use instruction::{greeting, system_instruction, ASSISTANT_NAME, EMPTY_REPLY, FALLBACK_REPLY};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AskResponse, ConversationView};

/// Conversations untouched for this long are dropped.
pub const CONVERSATION_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Open conversations kept at most; the least recently used goes first.
pub const MAX_CONVERSATIONS: usize = 1_000;

/// Turn the backend outcome into the text students see.
pub fn settle_reply(outcome: Result<String, AssistantError>) -> String {
    match outcome {
        Ok(text) if text.trim().is_empty() => EMPTY_REPLY.to_string(),
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Error calling the assistant backend: {}", e);
            FALLBACK_REPLY.to_string()
        }
    }
}

struct Entry {
    conversation: Arc<Mutex<Conversation>>,
    last_touched: Instant,
}

/// All open tutor conversations.
pub struct AssistantService {
    backend: Arc<dyn AssistantBackend>,
    instruction: String,
    max_conversations: usize,
    idle_timeout: Duration,
    conversations: RwLock<HashMap<Uuid, Entry>>,
}

impl AssistantService {
    pub fn new(backend: Arc<dyn AssistantBackend>, instruction: String) -> Self {
        Self::with_limits(
            backend,
            instruction,
            MAX_CONVERSATIONS,
            CONVERSATION_IDLE_TIMEOUT,
        )
    }

    pub fn with_limits(
        backend: Arc<dyn AssistantBackend>,
        instruction: String,
        max_conversations: usize,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            instruction,
            max_conversations,
            idle_timeout,
            conversations: RwLock::new(HashMap::new()),
        }
    }

    pub async fn open(&self) -> ConversationView {
        let id = Uuid::new_v4();
        let conversation = Conversation::new(greeting());
        let view = view_of(id, &conversation);

        let mut conversations = self.conversations.write().await;
        self.evict(&mut conversations);
        conversations.insert(
            id,
            Entry {
                conversation: Arc::new(Mutex::new(conversation)),
                last_touched: Instant::now(),
            },
        );
        tracing::debug!(%id, open = conversations.len(), "Assistant conversation opened");
        view
    }

    pub async fn get(&self, id: Uuid) -> Result<ConversationView, AppError> {
        let conversation = self.lookup(id).await?;
        let conversation = conversation.lock().await;
        Ok(view_of(id, &conversation))
    }

    /// Forget a conversation. A reply still in flight is dropped when it lands.
    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        self.conversations
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    /// Submit one question and wait for its reply.
    pub async fn ask(&self, id: Uuid, text: &str) -> Result<AskResponse, AppError> {
        let conversation = self.lookup(id).await?;

        let transcript = {
            let mut guard = conversation.lock().await;
            match guard.begin(text) {
                Submission::Ignored => {
                    return Ok(AskResponse {
                        reply: None,
                        transcript: guard.transcript().to_vec(),
                    })
                }
                Submission::Busy => {
                    return Err(AppError::AssistantBusy(
                        "The assistant is still answering the previous question".to_string(),
                    ))
                }
                Submission::Accepted(transcript) => transcript,
            }
        };

        let request = GenerationRequest {
            system_instruction: self.instruction.clone(),
            transcript,
            temperature: instruction::TEMPERATURE,
            top_p: instruction::TOP_P,
        };

        // The reply is recorded in its own task so the conversation returns to idle even if
        // the client disconnects. The backend call runs in a nested task so a panic there
        // still ends in the fallback turn.
        let backend = self.backend.clone();
        let pending = conversation.clone();
        let task = tokio::spawn(async move {
            let call = tokio::spawn(async move { backend.generate(&request).await });
            let reply = match call.await {
                Ok(outcome) => settle_reply(outcome),
                Err(e) => {
                    tracing::error!("Assistant backend task failed: {}", e);
                    FALLBACK_REPLY.to_string()
                }
            };
            let mut guard = pending.lock().await;
            let turn = guard.finish(reply);
            AskResponse {
                reply: Some(turn),
                transcript: guard.transcript().to_vec(),
            }
        });

        task.await
            .map_err(|e| AppError::Internal(format!("Assistant task failed: {}", e)))
    }

    async fn lookup(&self, id: Uuid) -> Result<Arc<Mutex<Conversation>>, AppError> {
        let mut conversations = self.conversations.write().await;
        let expired = conversations
            .get(&id)
            .map(|entry| entry.last_touched.elapsed() >= self.idle_timeout)
            .ok_or_else(|| not_found(id))?;
        if expired {
            conversations.remove(&id);
            return Err(not_found(id));
        }

        let entry = conversations.get_mut(&id).ok_or_else(|| not_found(id))?;
        entry.last_touched = Instant::now();
        Ok(entry.conversation.clone())
    }

    /// Drop idle conversations, then the least recently used ones until there is room for one more.
    fn evict(&self, conversations: &mut HashMap<Uuid, Entry>) {
        let before = conversations.len();
        conversations.retain(|_, entry| entry.last_touched.elapsed() < self.idle_timeout);
        while !conversations.is_empty() && conversations.len() >= self.max_conversations {
            let oldest = conversations
                .iter()
                .min_by_key(|(_, entry)| entry.last_touched)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => conversations.remove(&id),
                None => break,
            };
        }

        let evicted = before - conversations.len();
        if evicted > 0 {
            tracing::info!(evicted, "Assistant conversations evicted");
        }
    }
}

fn view_of(id: Uuid, conversation: &Conversation) -> ConversationView {
    ConversationView {
        id: id.to_string(),
        awaiting_response: conversation.is_awaiting(),
        transcript: conversation.transcript().to_vec(),
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Conversation {} not found", id))
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use crate::models::{AssistantTurn, Role};
    use tokio::sync::Notify;

    fn service(backend: Arc<ScriptedBackend>) -> AssistantService {
        AssistantService::new(backend, "instrução".to_string())
    }

    #[tokio::test]
    async fn test_accepted_question_gets_one_reply() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("Use ABNT.".into())]));
        let service = service(backend.clone());
        let conversation = service.open().await;
        let id = conversation.id.parse().unwrap();

        let response = service.ask(id, "Como citar?").await.unwrap();

        assert_eq!(response.reply, Some(AssistantTurn::model("Use ABNT.")));
        assert_eq!(response.transcript.len(), 3);
        assert_eq!(response.transcript[1], AssistantTurn::user("Como citar?"));
        assert_eq!(backend.calls(), 1);

        let sent = backend.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.system_instruction, "instrução");
        assert_eq!(sent.transcript.len(), 2);
        assert_eq!(sent.temperature, 0.7);
        assert!(!service.get(id).await.unwrap().awaiting_response);
    }

    #[tokio::test]
    async fn test_blank_question_makes_no_call() {
        let backend = Arc::new(ScriptedBackend::new(vec![]));
        let service = service(backend.clone());
        let id = service.open().await.id.parse().unwrap();

        let response = service.ask(id, "   ").await.unwrap();

        assert!(response.reply.is_none());
        assert_eq!(response.transcript.len(), 1);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_becomes_fallback_turn() {
        let backend = Arc::new(ScriptedBackend::new(vec![Err("quota".into())]));
        let service = service(backend);
        let id = service.open().await.id.parse().unwrap();

        let response = service.ask(id, "Olá?").await.unwrap();

        let last = response.transcript.last().unwrap();
        assert_eq!(last.role, Role::Model);
        assert_eq!(last.text, FALLBACK_REPLY);
        let models = response
            .transcript
            .iter()
            .skip(1)
            .filter(|t| t.role == Role::Model)
            .count();
        assert_eq!(models, 1);
        assert!(!service.get(id).await.unwrap().awaiting_response);
    }

    #[tokio::test]
    async fn test_empty_reply_becomes_apology() {
        let backend = Arc::new(ScriptedBackend::new(vec![Ok("  ".into())]));
        let service = service(backend);
        let id = service.open().await.id.parse().unwrap();

        let response = service.ask(id, "Olá?").await.unwrap();
        assert_eq!(response.reply.unwrap().text, EMPTY_REPLY);
    }

    #[tokio::test]
    async fn test_second_question_while_waiting_is_rejected() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(ScriptedBackend::gated(
            vec![Ok("Primeira resposta".into())],
            gate.clone(),
        ));
        let service = Arc::new(service(backend.clone()));
        let id: Uuid = service.open().await.id.parse().unwrap();

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.ask(id, "Primeira").await })
        };
        while backend.calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(service.get(id).await.unwrap().awaiting_response);

        let err = service.ask(id, "Segunda").await.unwrap_err();
        assert_eq!(err.error_code(), "ASSISTANT_BUSY");

        gate.notify_one();
        let response = first.await.unwrap().unwrap();
        assert_eq!(response.transcript.len(), 3);
        assert_eq!(backend.calls(), 1);
    }

    struct PanickingBackend;

    #[async_trait::async_trait]
    impl AssistantBackend for PanickingBackend {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, AssistantError> {
            panic!("backend crashed");
        }
    }

    #[tokio::test]
    async fn test_backend_panic_still_returns_to_idle() {
        let service = AssistantService::new(Arc::new(PanickingBackend), "instrução".to_string());
        let id: Uuid = service.open().await.id.parse().unwrap();

        let response = service.ask(id, "Olá?").await.unwrap();
        assert_eq!(response.reply.unwrap().text, FALLBACK_REPLY);
        assert_eq!(response.transcript.len(), 3);

        let view = service.get(id).await.unwrap();
        assert!(!view.awaiting_response);

        // the next question is accepted, not rejected as busy
        let response = service.ask(id, "De novo?").await.unwrap();
        assert_eq!(response.transcript.len(), 5);
    }

    #[tokio::test]
    async fn test_open_evicts_least_recently_used_beyond_cap() {
        let service = AssistantService::with_limits(
            Arc::new(ScriptedBackend::new(vec![])),
            "instrução".to_string(),
            3,
            CONVERSATION_IDLE_TIMEOUT,
        );
        let mut ids: Vec<Uuid> = Vec::new();
        for _ in 0..3 {
            ids.push(service.open().await.id.parse().unwrap());
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        // touching the first one makes the second the oldest
        service.get(ids[0]).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;

        service.open().await;
        assert_eq!(service.conversations.read().await.len(), 3);
        assert!(service.get(ids[1]).await.is_err());
        assert!(service.get(ids[0]).await.is_ok());
        assert!(service.get(ids[2]).await.is_ok());

        for _ in 0..10 {
            service.open().await;
        }
        assert_eq!(service.conversations.read().await.len(), 3);
    }

    #[tokio::test]
    async fn test_idle_conversations_are_dropped() {
        let service = AssistantService::with_limits(
            Arc::new(ScriptedBackend::new(vec![])),
            "instrução".to_string(),
            MAX_CONVERSATIONS,
            Duration::ZERO,
        );
        let stale: Uuid = service.open().await.id.parse().unwrap();
        service.open().await;

        assert_eq!(service.conversations.read().await.len(), 1);
        assert_eq!(
            service.get(stale).await.unwrap_err().error_code(),
            "NOT_FOUND"
        );
    }

    #[tokio::test]
    async fn test_unknown_and_closed_conversations() {
        let service = service(Arc::new(ScriptedBackend::new(vec![])));
        assert!(service.get(Uuid::new_v4()).await.is_err());

        let id = service.open().await.id.parse().unwrap();
        service.close(id).await.unwrap();
        assert_eq!(
            service.ask(id, "Oi").await.unwrap_err().error_code(),
            "NOT_FOUND"
        );
        assert!(service.close(id).await.is_err());
    }

    #[test]
    fn test_settle_reply() {
        assert_eq!(settle_reply(Ok("ok".into())), "ok");
        assert_eq!(settle_reply(Ok("".into())), EMPTY_REPLY);
        assert_eq!(
            settle_reply(Err(AssistantError::MissingApiKey)),
            FALLBACK_REPLY
        );
    }
}
