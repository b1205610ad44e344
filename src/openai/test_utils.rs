//! Shared test utilities for the `openai` module.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;

use crate::openai::client::CompletionClient;

/// Mock completion client keyed by prompt.
///
/// Each prompt maps to either a canned answer or an error message. Prompts
/// without an entry are echoed back prefixed with `echo: `. An optional
/// per-prompt delay lets tests finish calls out of order.
///
/// Every call to [`complete`](CompletionClient::complete) records its prompt;
/// use [`prompt_handle`](Self::prompt_handle) to inspect them after the
/// client has been moved into an orchestrator.
pub(crate) struct MockCompletionClient {
    answers: HashMap<String, std::result::Result<String, String>>,
    delays: HashMap<String, Duration>,
    recorded_prompts: Arc<Mutex<Vec<String>>>,
}

impl MockCompletionClient {
    /// Creates a mock that echoes every prompt.
    pub(crate) fn new() -> Self {
        Self {
            answers: HashMap::new(),
            delays: HashMap::new(),
            recorded_prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers `prompt` with `response`.
    pub(crate) fn answer(mut self, prompt: &str, response: &str) -> Self {
        self.answers
            .insert(prompt.to_string(), Ok(response.to_string()));
        self
    }

    /// Fails `prompt` with `message`.
    pub(crate) fn fail(mut self, prompt: &str, message: &str) -> Self {
        self.answers
            .insert(prompt.to_string(), Err(message.to_string()));
        self
    }

    /// Delays the answer to `prompt`.
    pub(crate) fn delay(mut self, prompt: &str, delay: Duration) -> Self {
        self.delays.insert(prompt.to_string(), delay);
        self
    }

    /// Returns a handle for inspecting which prompts were sent.
    pub(crate) fn prompt_handle(&self) -> PromptRecordHandle {
        PromptRecordHandle {
            recorded_prompts: self.recorded_prompts.clone(),
        }
    }
}

/// Shared handle to a mock client's recorded prompts.
pub(crate) struct PromptRecordHandle {
    recorded_prompts: Arc<Mutex<Vec<String>>>,
}

impl PromptRecordHandle {
    /// Returns all recorded prompts in call order.
    pub(crate) fn prompts(&self) -> Vec<String> {
        self.recorded_prompts.lock().unwrap().clone()
    }

    /// Returns the number of completion requests that were made.
    pub(crate) fn request_count(&self) -> usize {
        self.recorded_prompts.lock().unwrap().len()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            self.recorded_prompts
                .lock()
                .unwrap()
                .push(prompt.to_string());
            if let Some(delay) = self.delays.get(prompt) {
                tokio::time::sleep(*delay).await;
            }
            match self.answers.get(prompt) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(message)) => Err(anyhow::anyhow!("{message}")),
                None => Ok(format!("echo: {prompt}")),
            }
        })
    }
}
