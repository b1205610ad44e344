//! OpenAI API integration: parameters, client, and prompt templates.

pub mod client;
pub mod error;
pub mod params;
pub mod prompts;
#[cfg(test)]
pub(crate) mod test_utils;

pub use client::{CompletionClient, OpenAiClient};
pub use error::HuskyError;
pub use params::{CompletionOverrides, CompletionParams};
pub use prompts::{DefaultPromptGenerator, PromptGenerator};
