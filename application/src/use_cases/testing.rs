//! Scripted gateway shared by the use case tests.

use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use async_trait::async_trait;
use ensemble_domain::{ModelDescriptor, ModelRole};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// What the scripted backend does for one backend model name.
#[derive(Debug, Clone)]
pub(crate) enum Script {
    Reply(String),
    /// Reply after sleeping
    Delayed(u64, String),
    Fail(String),
    Empty,
    /// Never answers
    Hang,
    /// Panics inside the call
    Panic,
}

/// Gateway answering per backend model name and recording every request.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    scripts: HashMap<String, Script>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, model: &str, script: Script) -> Self {
        self.scripts.insert(model.to_string(), script);
        self
    }

    pub(crate) fn reply(self, model: &str, text: &str) -> Self {
        self.with(model, Script::Reply(text.to_string()))
    }

    pub(crate) fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent to one backend model, in call order.
    pub(crate) fn requests_for(&self, model: &str) -> Vec<GenerationRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.model == model)
            .collect()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());

        match self.scripts.get(&request.model) {
            Some(Script::Reply(text)) => Ok(text.clone()),
            Some(Script::Delayed(ms, text)) => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                Ok(text.clone())
            }
            Some(Script::Fail(message)) => Err(GatewayError::RequestFailed(message.clone())),
            Some(Script::Empty) => Ok(String::new()),
            Some(Script::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            Some(Script::Panic) => panic!("scripted panic for {}", request.model),
            None => Err(GatewayError::ModelNotAvailable(request.model.clone())),
        }
    }
}

/// Descriptor whose backend model name is `id` itself.
pub(crate) fn model(id: &str, role: ModelRole) -> ModelDescriptor {
    ModelDescriptor::new(id, id, role).with_name(id.to_uppercase())
}
