//! Gemini `generateContent` adapter for the tutor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::backend::{AssistantBackend, AssistantError, GenerationRequest};
use crate::config::{AssistantConfig, Secret};
use crate::models::Role;

pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Calls the Gemini REST API.
#[derive(Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<Secret>,
}

impl GeminiBackend {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
    }
}

/// Build the request body. Gemini expects the conversation to open with a user turn,
/// so model turns ahead of the first question (the greeting) are left out.
fn build_body(request: &GenerationRequest) -> GenerateContentBody {
    let contents = request
        .transcript
        .iter()
        .skip_while(|turn| turn.role == Role::Model)
        .map(|turn| {
            let role = match turn.role {
                Role::User => "user",
                Role::Model => "model",
            };
            text_content(Some(role), &turn.text)
        })
        .collect();

    GenerateContentBody {
        system_instruction: text_content(None, &request.system_instruction),
        contents,
        generation_config: GenerationConfig {
            temperature: request.temperature,
            top_p: request.top_p,
        },
    }
}

/// Concatenate the text parts of the first candidate.
fn reply_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl AssistantBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistantError> {
        let api_key = self.api_key.as_ref().ok_or(AssistantError::MissingApiKey)?;

        tracing::debug!(
            model = %self.model,
            turns = request.transcript.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key.expose())
            .json(&build_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| AssistantError::Decode(e.to_string()))?;
        Ok(reply_text(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssistantTurn;
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured {
        body: Arc<Mutex<Option<Value>>>,
        api_key: Arc<Mutex<Option<String>>>,
        path: Arc<Mutex<Option<String>>>,
    }

    /// Serve `reply` with `status` for every generateContent call and record what arrived.
    async fn stub_server(status: StatusCode, reply: Value) -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/v1beta/models/{*action}",
                post(
                    move |State(captured): State<Captured>,
                          uri: axum::http::Uri,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            *captured.body.lock().unwrap() = Some(body);
                            *captured.path.lock().unwrap() = Some(uri.path().to_string());
                            *captured.api_key.lock().unwrap() = headers
                                .get(API_KEY_HEADER)
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            (status, Json(reply))
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), captured)
    }

    fn backend(base_url: &str, api_key: Option<&str>) -> GeminiBackend {
        GeminiBackend::new(&AssistantConfig {
            api_key: api_key.map(Secret::new),
            model: "gemini-test".to_string(),
            base_url: format!("{}/", base_url),
            professor_contact: None,
            instruction_path: None,
        })
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_instruction: "Seja breve.".to_string(),
            transcript: vec![
                AssistantTurn::model("Olá!"),
                AssistantTurn::user("Quantas horas por etapa?"),
                AssistantTurn::model("100h."),
                AssistantTurn::user("E por dia?"),
            ],
            temperature: 0.7,
            top_p: 0.95,
        }
    }

    #[test]
    fn test_body_drops_leading_greeting_and_tags_roles() {
        let body = serde_json::to_value(build_body(&request())).unwrap();
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "E por dia?");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Seja breve.");
        assert!(body["systemInstruction"].get("role").is_none());
        assert!((body["generationConfig"]["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_reply_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "Máx " }, { "text": "6h/dia." }] } }]
        }))
        .unwrap();
        assert_eq!(reply_text(response), "Máx 6h/dia.");

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(reply_text(empty), "");
    }

    #[tokio::test]
    async fn test_generate_posts_to_model_endpoint() {
        let (url, captured) = stub_server(
            StatusCode::OK,
            serde_json::json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": "No máximo 6 horas." }] } }]
            }),
        )
        .await;

        let reply = backend(&url, Some("test-key"))
            .generate(&request())
            .await
            .unwrap();

        assert_eq!(reply, "No máximo 6 horas.");
        assert_eq!(
            captured.path.lock().unwrap().as_deref(),
            Some("/v1beta/models/gemini-test:generateContent")
        );
        assert_eq!(captured.api_key.lock().unwrap().as_deref(), Some("test-key"));
        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error_message() {
        let (url, _) = stub_server(
            StatusCode::TOO_MANY_REQUESTS,
            serde_json::json!({ "error": { "code": 429, "message": "Quota exceeded" } }),
        )
        .await;

        let err = backend(&url, Some("test-key"))
            .generate(&request())
            .await
            .unwrap_err();

        match err {
            AssistantError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_generate_without_key_fails_fast() {
        let err = backend("http://127.0.0.1:9", None)
            .generate(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::MissingApiKey));
    }
}
