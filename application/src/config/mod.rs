//! Application-level configuration.
//!
//! - [`ExecutionParams`]: per-call limits (timeouts)

pub mod execution_params;

pub use execution_params::ExecutionParams;
