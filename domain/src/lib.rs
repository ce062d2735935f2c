//! Domain layer for model-ensemble
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Collaboration
//!
//! A single request is fanned out to several [`ModelDescriptor`]s. Two
//! orthogonal settings shape the run:
//!
//! - **[`Topology`]**: which models run, in what order, with what input
//! - **[`CombinationStrategy`]**: how parallel contributions collapse into one answer
//!
//! ## Contributions
//!
//! Every dispatched model yields exactly one [`Contribution`] whose
//! [`ContributionOutcome`] is either content or a typed failure. Failures
//! never abort a run.

pub mod config;
pub mod context;
pub mod core;
pub mod orchestration;
pub mod performance;
pub mod prompt;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use context::{Complexity, Mood, SituationalContext, Tone, Urgency};
pub use core::{
    error::OrchestrationError,
    model::{ModelDescriptor, ModelRole},
};
pub use orchestration::{
    config::CollaborationConfig,
    entities::{RunPhase, RunTracker},
    topology::{CombinationStrategy, Topology},
    value_objects::{Contribution, ContributionOutcome, FailureKind, ResponseEnvelope},
};
pub use performance::PerformanceRecord;
pub use prompt::PromptTemplate;
