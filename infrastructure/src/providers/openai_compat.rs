//! OpenAI-compatible chat completions backend
//!
//! Works against any endpoint exposing `POST {base_url}/chat/completions`:
//! the OpenAI API, Azure-style proxies, Ollama, vLLM, LM Studio.

use super::ProviderError;
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use ensemble_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

// ============================================================================
// Gateway
// ============================================================================

/// Connection settings for one OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl OpenAiCompatConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&FileProviderConfig> for OpenAiCompatConfig {
    fn from(file: &FileProviderConfig) -> Self {
        Self::new(file.base_url.clone())
            .with_api_key(file.api_key())
            .with_timeout(file.timeout())
    }
}

/// [`LlmGateway`] speaking the chat completions protocol over HTTP
pub struct OpenAiCompatGateway {
    client: Client,
    config: OpenAiCompatConfig,
}

impl OpenAiCompatGateway {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatGateway {
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let body = chat_request(request);
        debug!("Sending chat completion to {} ({})", self.config.base_url, request.model);

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else if e.is_connect() {
                GatewayError::ConnectionError(format!(
                    "failed to connect to {}",
                    self.config.base_url
                ))
            } else {
                GatewayError::ConnectionError(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::ConnectionError(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(status_error(status, &request.model, &text));
        }

        parse_completion(&text)
    }
}

fn chat_request(request: &GenerationRequest) -> ChatRequest<'_> {
    let mut messages = Vec::with_capacity(2);
    if !request.system_instruction.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: &request.system_instruction,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: &request.user_text,
    });

    ChatRequest {
        model: &request.model,
        messages,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        stream: false,
    }
}

/// First choice's text; a missing `content` reads as empty.
fn parse_completion(body: &str) -> Result<String, GatewayError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| GatewayError::MalformedResponse("no choices in response".to_string()))
}

fn status_error(status: StatusCode, model: &str, body: &str) -> GatewayError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());

    match status {
        StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(format!("{}: {}", model, detail)),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status.as_u16(), detail)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::{ModelDescriptor, ModelRole};

    fn request(system: &str) -> GenerationRequest {
        let model = ModelDescriptor::new("m", "gpt-4o-mini", ModelRole::Primary)
            .with_temperature(0.25)
            .with_max_tokens(300);
        GenerationRequest::for_model(&model, system, "hello")
    }

    #[test]
    fn test_chat_request_shape() {
        let req = request("be brief");
        let json = serde_json::to_value(chat_request(&req)).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be brief");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_empty_system_instruction_omitted() {
        let req = request("");
        let json = serde_json::to_value(chat_request(&req)).unwrap();
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Hi there"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Hi there");
    }

    #[test]
    fn test_parse_null_content_is_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "");
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_completion("not json"),
            Err(GatewayError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#;
        match status_error(StatusCode::TOO_MANY_REQUESTS, "gpt-4o", body) {
            GatewayError::RequestFailed(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("Rate limit reached"));
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "nope", "<html>"),
            GatewayError::ModelNotAvailable(m) if m.starts_with("nope")
        ));
        assert!(matches!(
            status_error(StatusCode::GATEWAY_TIMEOUT, "m", ""),
            GatewayError::Timeout
        ));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let gateway =
            OpenAiCompatGateway::new(OpenAiCompatConfig::new("http://localhost:11434/v1/")).unwrap();
        assert_eq!(gateway.endpoint(), "http://localhost:11434/v1/chat/completions");
    }
}
