//! Generator - produces SQL text from a natural-language prompt
//!
//! The guard only sees text coming back. Whatever the generator returns
//! is checked by the decision engine; a generator failure is turned into
//! a rejected decision by the caller.

pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::{OpenAiConfig, OpenAiGenerator};
pub use prompt::{build_prompt, Prompt, SYSTEM_PROMPT};

/// Generator errors
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// No API credentials configured
    #[error("Missing API key")]
    MissingApiKey,
    /// Transport or timeout failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// Response carried no usable text
    #[error("Empty response")]
    EmptyResponse,
}

/// Result type for generator calls
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Source of generated SQL (or refusal) text
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text for a prompt
    async fn generate(&self, prompt: &Prompt) -> GeneratorResult<String>;

    /// Model name for logging
    fn model_name(&self) -> &str;
}
