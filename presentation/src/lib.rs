//! Presentation layer for model-ensemble
//!
//! This crate contains CLI definitions, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, CombinationArg, OutputArg, TopologyArg};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
