//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod collaborate;
pub mod combine;
pub mod invoke_model;
pub mod orchestrate;

#[cfg(test)]
pub(crate) mod testing;
