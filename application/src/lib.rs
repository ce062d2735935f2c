//! Application layer for model-ensemble
//!
//! This crate contains use cases, port definitions, the performance ledger
//! and execution parameters. It depends only on the domain layer.

pub mod config;
pub mod ledger;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ledger::PerformanceLedger;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, GenerationRequest, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::invoke_model::{InvocationFailure, InvocationScope};
pub use use_cases::orchestrate::OrchestrateUseCase;
