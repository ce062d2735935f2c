//! LLM Gateway port
//!
//! Defines the single capability the orchestrator needs from the outside
//! world: one request/response text generation call.

use async_trait::async_trait;
use ensemble_domain::ModelDescriptor;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Parameters of one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub user_text: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Backend model name
    pub model: String,
    /// Provider tag, used by routing gateways
    pub provider: String,
}

impl GenerationRequest {
    /// Build a request carrying the descriptor's generation parameters.
    pub fn for_model(
        model: &ModelDescriptor,
        system_instruction: impl Into<String>,
        user_text: impl Into<String>,
    ) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_text: user_text.into(),
            temperature: model.temperature,
            max_tokens: model.max_tokens,
            model: model.model.clone(),
            provider: model.provider.clone(),
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Issue one generation call and return the produced text.
    ///
    /// No streaming; an empty string is a valid return and is treated as a
    /// failure by callers.
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String, GatewayError>;
}
