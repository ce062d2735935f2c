//! Infrastructure layer for model-ensemble
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileConfig, FileModelConfig, FileOrchestrationConfig,
    FileOutputConfig, FileProviderConfig, FileProvidersConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{OpenAiCompatConfig, OpenAiCompatGateway, ProviderError, RoutingGateway};
