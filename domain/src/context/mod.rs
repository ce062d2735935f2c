//! Situational context of a request
//!
//! Derived once per request from its text and used to steer prompt
//! construction. Read-only after classification.

pub mod situational;

pub use situational::{Complexity, Mood, SituationalContext, Tone, Urgency};
