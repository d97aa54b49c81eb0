//! Generators with scripted behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use fieldguard::generator::{Generator, GeneratorError, GeneratorResult, Prompt};

/// Returns a fixed reply and records every prompt it sees.
pub struct ScriptedGenerator {
    reply: String,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedGenerator {
    pub fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Number of generate calls so far
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    /// Last prompt seen
    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().last().cloned()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &Prompt) -> GeneratorResult<String> {
        self.prompts.lock().push(prompt.clone());
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Always fails with a 503.
#[derive(Default)]
pub struct FailingGenerator {
    calls: AtomicUsize,
}

impl FailingGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &Prompt) -> GeneratorResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GeneratorError::Status {
            status: 503,
            body: "upstream unavailable".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}
