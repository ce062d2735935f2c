//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelDescriptor`]: one configured generative-text backend
//! - [`model::ModelRole`]: the part a model plays in a collaboration
//! - [`error::OrchestrationError`]: run-level errors

pub mod error;
pub mod model;
pub mod string;
