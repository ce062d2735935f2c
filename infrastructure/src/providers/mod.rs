//! Backend providers
//!
//! [`OpenAiCompatGateway`] talks to one HTTP endpoint; [`RoutingGateway`]
//! picks the endpoint per request from the descriptor's provider tag.

pub mod openai_compat;
pub mod routing;

pub use openai_compat::{OpenAiCompatConfig, OpenAiCompatGateway};
pub use routing::RoutingGateway;

use thiserror::Error;

/// Errors raised while building provider clients
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP client error: {0}")]
    Client(String),
}
