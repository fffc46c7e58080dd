//! Prompt system for grounded.
//!
//! This crate provides structured prompt management with:
//! - Built-in prompts for answer synthesis, query expansion and related questions
//! - YAML-based overrides under `.grounded/prompts/`
//! - Handlebars template rendering

pub mod builder;
pub mod builtin;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::PromptLibrary;
pub use builtin::{ANSWER_PROMPT_ID, HYPOTHETICAL_PROMPT_ID, RELATED_QUESTIONS_PROMPT_ID};
pub use loader::{list_prompts, load_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
