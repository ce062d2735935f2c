use super::{OpenAiCompatConfig, OpenAiCompatGateway, ProviderError};
use crate::config::FileProvidersConfig;
use async_trait::async_trait;
use ensemble_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Dispatches each request to the gateway registered for its provider tag.
pub struct RoutingGateway {
    providers: HashMap<String, Arc<dyn LlmGateway>>,
}

impl RoutingGateway {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn with_provider(mut self, tag: impl Into<String>, gateway: Arc<dyn LlmGateway>) -> Self {
        self.providers.insert(tag.into(), gateway);
        self
    }

    /// One HTTP gateway per `[providers.<tag>]` section.
    pub fn from_config(config: &FileProvidersConfig) -> Result<Self, ProviderError> {
        let mut routing = Self::new();
        for (tag, provider) in config.iter() {
            let gateway = OpenAiCompatGateway::new(OpenAiCompatConfig::from(provider))?;
            debug!("Registered provider '{}' at {}", tag, provider.base_url);
            routing = routing.with_provider(tag.clone(), Arc::new(gateway));
        }
        Ok(routing)
    }

    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    fn resolve(&self, request: &GenerationRequest) -> Result<&dyn LlmGateway, GatewayError> {
        self.providers
            .get(&request.provider)
            .map(|gateway| gateway.as_ref())
            .ok_or_else(|| {
                GatewayError::ModelNotAvailable(format!(
                    "{}: provider '{}' is not configured",
                    request.model, request.provider
                ))
            })
    }
}

impl Default for RoutingGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        self.resolve(request)?.generate_text(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileProviderConfig;
    use ensemble_domain::{ModelDescriptor, ModelRole};

    struct Tagged(&'static str);

    #[async_trait]
    impl LlmGateway for Tagged {
        async fn generate_text(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
            Ok(format!("{} answered {}", self.0, request.model))
        }
    }

    fn request(provider: &str) -> GenerationRequest {
        let model = ModelDescriptor::new("m", "llama3.1", ModelRole::Primary).with_provider(provider);
        GenerationRequest::for_model(&model, "", "hi")
    }

    #[tokio::test]
    async fn test_routes_by_provider_tag() {
        let gateway = RoutingGateway::new()
            .with_provider("openai", Arc::new(Tagged("openai")))
            .with_provider("local", Arc::new(Tagged("local")));

        assert_eq!(
            gateway.generate_text(&request("local")).await.unwrap(),
            "local answered llama3.1"
        );
        assert_eq!(
            gateway.generate_text(&request("openai")).await.unwrap(),
            "openai answered llama3.1"
        );
    }

    #[tokio::test]
    async fn test_unknown_provider_is_model_not_available() {
        let gateway = RoutingGateway::new().with_provider("openai", Arc::new(Tagged("openai")));

        let err = gateway.generate_text(&request("azure")).await.unwrap_err();
        assert!(matches!(err, GatewayError::ModelNotAvailable(msg) if msg.contains("azure")));
    }

    #[test]
    fn test_from_config_registers_every_section() {
        let mut config = FileProvidersConfig::default();
        config.0.insert(
            "local".to_string(),
            FileProviderConfig {
                base_url: "http://localhost:11434/v1".to_string(),
                api_key_env: String::new(),
                timeout_secs: 300,
            },
        );

        let gateway = RoutingGateway::from_config(&config).unwrap();
        assert_eq!(gateway.tags(), vec!["local", "openai"]);
    }
}
