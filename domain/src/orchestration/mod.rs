//! Multi-model orchestration domain
//!
//! Configuration, lifecycle, result types and the pure rules (confidence,
//! combination, selection) used by the orchestrate use case.

pub mod combination;
pub mod confidence;
pub mod config;
pub mod entities;
pub mod topology;
pub mod value_objects;
