//! Prompt construction for model calls

pub mod template;

pub use template::PromptTemplate;
