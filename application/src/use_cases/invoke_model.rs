//! Backend invocation adapter
//!
//! Wraps exactly one call to the generative-text backend for one model
//! descriptor. Every outcome, including timeouts and cancellation, comes back
//! as a [`Contribution`]; nothing is raised to the caller.

use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use ensemble_domain::orchestration::confidence;
use ensemble_domain::{Contribution, FailureKind, ModelDescriptor, PromptTemplate, SituationalContext};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Request-wide settings shared by every call of one run.
#[derive(Debug, Clone, Default)]
pub struct InvocationScope {
    pub context: Option<SituationalContext>,
    pub tools: Vec<String>,
    pub call_timeout: Option<Duration>,
    pub cancellation: CancellationToken,
}

impl InvocationScope {
    pub fn new(cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: Option<SituationalContext>) -> Self {
        self.context = context;
        self
    }

    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }
}

/// Why a backend call produced no usable text
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl InvocationFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<GatewayError> for InvocationFailure {
    fn from(error: GatewayError) -> Self {
        let kind = match error {
            GatewayError::Timeout => FailureKind::Timeout,
            _ => FailureKind::Backend,
        };
        Self::new(kind, error.to_string())
    }
}

/// Issue one backend call under the scope's timeout and cancellation token.
///
/// Empty or whitespace-only text counts as a failure.
pub async fn call_backend(
    gateway: &dyn LlmGateway,
    request: &GenerationRequest,
    scope: &InvocationScope,
) -> Result<String, InvocationFailure> {
    if scope.cancellation.is_cancelled() {
        return Err(InvocationFailure::new(
            FailureKind::Cancelled,
            "cancelled before dispatch",
        ));
    }

    let bounded = async {
        match scope.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, gateway.generate_text(request)).await {
                Ok(result) => result.map_err(InvocationFailure::from),
                Err(_) => Err(InvocationFailure::new(
                    FailureKind::Timeout,
                    format!("no response within {} ms", limit.as_millis()),
                )),
            },
            None => gateway
                .generate_text(request)
                .await
                .map_err(InvocationFailure::from),
        }
    };

    let text = tokio::select! {
        biased;
        _ = scope.cancellation.cancelled() => {
            return Err(InvocationFailure::new(FailureKind::Cancelled, "cancelled by caller"));
        }
        result = bounded => result?,
    };

    if text.trim().is_empty() {
        return Err(InvocationFailure::new(
            FailureKind::EmptyResponse,
            "backend returned empty text",
        ));
    }

    Ok(text)
}

/// Run `prompt` against one model and wrap the outcome as a [`Contribution`].
pub async fn invoke_model(
    gateway: &dyn LlmGateway,
    model: &ModelDescriptor,
    prompt: &str,
    scope: &InvocationScope,
) -> Contribution {
    let system = PromptTemplate::instruction_prefix(model, scope.context.as_ref(), &scope.tools);
    let request = GenerationRequest::for_model(model, system, prompt);

    let started = Instant::now();
    let result = call_backend(gateway, &request, scope).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(text) => {
            let confidence = confidence::score(&text, model);
            debug!(
                "Model {} responded in {} ms (confidence {:.2})",
                model.id, latency_ms, confidence
            );
            Contribution::success(model, text, latency_ms, confidence)
        }
        Err(failure) => {
            warn!(
                "Model {} failed ({}): {}",
                model.id, failure.kind, failure.message
            );
            Contribution::failure(model, failure.kind, failure.message, latency_ms)
        }
    }
}
