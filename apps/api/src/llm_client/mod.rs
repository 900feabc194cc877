/// LLM Client — the single point of entry for calls to the text-generation service.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// Everything goes through the `TextGenerator` trait implemented here.
///
/// One outbound request per call. No retries, no caching, no client timeout.
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

pub mod prompts;
pub mod schema;

use schema::ResponseSchema;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// The model used for every generation call. Hardcoded to prevent drift.
pub const MODEL: &str = "gemini-2.5-flash";
const JSON_MIME_TYPE: &str = "application/json";

/// Errors surfaced to callers of the generation client.
///
/// Display strings are shown to end users verbatim, so they never carry
/// upstream detail. The detailed cause is logged at the point of failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Failed to generate content from the text generation service.")]
    Upstream,

    #[error("Received an invalid format for job titles.")]
    MalformedResponse,
}

/// Detailed transport/service failures. Logged, then collapsed into `GenerationError::Upstream`.
#[derive(Debug, Error)]
enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Dispatches prompts to a text-generation backend.
///
/// `LlmClient` is the production implementation; tests substitute scripted fakes.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Unstructured completion. Returns the raw generated text.
    async fn generate_free_text(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Completion constrained to a JSON document matching `shape`.
    /// Returns the response text still serialized.
    async fn generate_structured(
        &self,
        prompt: &str,
        shape: &ResponseSchema,
    ) -> Result<String, GenerationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a ResponseSchema,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, shape: Option<&'a ResponseSchema>) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: shape.map(|response_schema| GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
                response_schema,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any text is present.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .build()
                .context("Failed to build HTTP client")?,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Client pointed at a local stand-in for the generation API.
    #[cfg(test)]
    fn with_base_url(api_key: &str, base_url: String) -> Result<Self> {
        let mut client = Self::new(api_key.to_string())?;
        client.base_url = base_url;
        Ok(client)
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{MODEL}:generateContent", self.base_url)
    }

    /// Makes exactly one call to the generation API and returns the text it produced.
    async fn call(&self, prompt: &str, shape: Option<&ResponseSchema>) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest::new(prompt, shape);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.text().ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate_free_text(&self, prompt: &str) -> Result<String, GenerationError> {
        self.call(prompt, None).await.map_err(|e| {
            error!("Error generating content: {e}");
            GenerationError::Upstream
        })
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        shape: &ResponseSchema,
    ) -> Result<String, GenerationError> {
        self.call(prompt, Some(shape)).await.map_err(|e| {
            error!("Error generating JSON content: {e}");
            GenerationError::Upstream
        })
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or_else(|| {
                    warn!("Unterminated code fence in structured response");
                    stripped
                })
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, Json, Router};
    use serde_json::json;

    #[test]
    fn test_free_text_request_has_no_generation_config() {
        let body = serde_json::to_value(GenerateContentRequest::new("Write a resume", None)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Write a resume" }] }]
            })
        );
    }

    #[test]
    fn test_structured_request_carries_mime_type_and_schema() {
        let shape = ResponseSchema::object().property("title", ResponseSchema::string(), true);
        let body =
            serde_json::to_value(GenerateContentRequest::new("Suggest a title", Some(&shape)))
                .unwrap();

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            json!(["title"])
        );
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = LlmClient::new("test-key".to_string()).unwrap();
        assert_eq!(
            client.endpoint(),
            format!("{GEMINI_API_BASE}/models/{MODEL}:generateContent")
        );
    }

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "## Resume\n" }, { "text": "Body" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 30 }
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("## Resume\nBody"));
        assert_eq!(response.usage_metadata.unwrap().candidates_token_count, 30);
    }

    #[test]
    fn test_whitespace_only_text_yields_none() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  \n\t" }] } }]
        }))
        .unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_response_without_text_yields_none() {
        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.text().is_none());

        let blocked: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert!(blocked.text().is_none());
    }

    #[test]
    fn test_generation_error_messages_do_not_leak_detail() {
        assert_eq!(
            GenerationError::Upstream.to_string(),
            "Failed to generate content from the text generation service."
        );
        assert_eq!(
            GenerationError::MalformedResponse.to_string(),
            "Received an invalid format for job titles."
        );
    }

    /// Serves `status` and `body` for every request on an ephemeral local port.
    async fn stub_api(status: StatusCode, body: serde_json::Value) -> String {
        let app = Router::new().fallback(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_successful_call_returns_text() {
        let base = stub_api(
            StatusCode::OK,
            json!({ "candidates": [{ "content": { "parts": [{ "text": "## Resume" }] } }] }),
        )
        .await;
        let client = LlmClient::with_base_url("test-key", base).unwrap();

        assert_eq!(
            client.generate_free_text("Write a resume").await,
            Ok("## Resume".to_string())
        );
    }

    #[tokio::test]
    async fn test_service_error_is_upstream_without_detail() {
        let base = stub_api(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": { "message": "secret" } }),
        )
        .await;
        let client = LlmClient::with_base_url("test-key", base).unwrap();

        let err = client.generate_free_text("Write a resume").await.unwrap_err();
        assert_eq!(err, GenerationError::Upstream);
        assert!(!err.to_string().contains("secret"));

        let shape = ResponseSchema::object().property("title", ResponseSchema::string(), true);
        let err = client
            .generate_structured("Suggest a title", &shape)
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::Upstream);
        assert!(!err.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_upstream() {
        let base = stub_api(StatusCode::OK, json!({ "candidates": [] })).await;
        let client = LlmClient::with_base_url("test-key", base).unwrap();

        assert_eq!(
            client.generate_free_text("Write a resume").await,
            Err(GenerationError::Upstream)
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_upstream() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = LlmClient::with_base_url("test-key", format!("http://{addr}")).unwrap();

        assert_eq!(
            client.generate_free_text("Write a resume").await,
            Err(GenerationError::Upstream)
        );
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }
}
