//! Request orchestration.
//!
//! A run turns one file into prompts, sends them all to the completion client
//! at once, and reports the outcome. Failures from the client are caught only
//! here; everything below propagates them.

use anyhow::Result;
use futures::future::try_join_all;
use tracing::{debug, error, warn};

use crate::config::{Mode, UserOptions};
use crate::files::FileReadResult;
use crate::openai::client::{CompletionClient, OpenAiClient};
use crate::openai::prompts::{DefaultPromptGenerator, PromptGenerator};

pub mod progress;
pub mod render;

pub use progress::{ProgressHandle, ProgressReporter, Spinner};
pub use render::{classify, Classification, Renderer, TerminalTypewriter, Typewriter};

/// Output returned when any completion call fails.
pub const FAILURE_MESSAGE: &str = "[huskygpt] Call OpenAI API failed!";

/// Separator placed between joined responses.
pub const RESPONSE_SEPARATOR: &str = "\n\n---\n\n";

/// Result of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every call succeeded; responses are in prompt order.
    Completed(Vec<String>),
    /// At least one call failed.
    Failed,
}

impl RunOutcome {
    /// Returns the joined responses, or [`FAILURE_MESSAGE`].
    #[must_use]
    pub fn into_output(self) -> String {
        match self {
            RunOutcome::Completed(responses) => responses.join(RESPONSE_SEPARATOR),
            RunOutcome::Failed => FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Sends every prompt concurrently and waits for all of them.
///
/// Responses come back in prompt order. The first failure fails the whole
/// batch and no partial results are returned.
pub async fn run_all(client: &dyn CompletionClient, prompts: &[String]) -> Result<Vec<String>> {
    let futs = prompts.iter().map(|prompt| {
        debug!(prompt = %prompt, "Dispatching prompt");
        client.complete(prompt)
    });
    try_join_all(futs).await
}

/// Running-state label for a mode.
fn progress_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Review => "[huskygpt] Reviewing your code...",
        Mode::Test => "[huskygpt] Generating unit tests...",
    }
}

/// Success message for a mode.
fn success_message(mode: Mode) -> &'static str {
    match mode {
        Mode::Review => "[huskygpt] Review finished",
        Mode::Test => "[huskygpt] Unit tests generated",
    }
}

/// Composes prompt generation, fan-out, progress, and rendering.
pub struct Orchestrator {
    mode: Mode,
    client: Box<dyn CompletionClient>,
    prompts: Box<dyn PromptGenerator>,
    progress: Box<dyn ProgressReporter>,
    renderer: Option<Renderer>,
}

impl Orchestrator {
    /// Creates an orchestrator without rendering.
    pub fn new(
        mode: Mode,
        client: Box<dyn CompletionClient>,
        prompts: Box<dyn PromptGenerator>,
        progress: Box<dyn ProgressReporter>,
    ) -> Self {
        Self {
            mode,
            client,
            prompts,
            progress,
            renderer: None,
        }
    }

    /// Enables the typing replay of responses.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Wires the production components for `options`.
    pub fn from_options(options: &UserOptions) -> Result<Self> {
        let orchestrator = Self::new(
            options.mode,
            Box::new(OpenAiClient::from_options(options)?),
            Box::new(DefaultPromptGenerator::from_options(options)),
            Box::new(Spinner),
        );
        Ok(if options.review_typing {
            orchestrator.with_renderer(Renderer::new(
                Box::new(TerminalTypewriter::default()),
                options.perfect_keyword.clone(),
            ))
        } else {
            orchestrator
        })
    }

    /// Returns the prompts for `file`.
    pub fn expand(&self, file: &FileReadResult) -> Vec<String> {
        self.prompts.prompts(file)
    }

    /// Runs `file` and reports success or failure without flattening it.
    pub async fn run_outcome(&self, file: &FileReadResult) -> RunOutcome {
        let prompts = self.expand(file);
        debug!(
            path = %file.path.display(),
            prompt_count = prompts.len(),
            "Expanded file into prompts"
        );

        let handle = self.progress.start(progress_label(self.mode));

        let responses = match run_all(self.client.as_ref(), &prompts).await {
            Ok(responses) => responses,
            Err(e) => {
                error!(path = %file.path.display(), "Completion request failed: {e:#}");
                handle.fail(FAILURE_MESSAGE);
                return RunOutcome::Failed;
            }
        };
        handle.succeed(success_message(self.mode));

        if let Some(renderer) = &self.renderer {
            if let Err(e) = renderer.render(&responses).await {
                warn!("Failed to render responses: {e:#}");
            }
        }

        RunOutcome::Completed(responses)
    }

    /// Runs `file` and returns the joined responses or [`FAILURE_MESSAGE`].
    pub async fn run(&self, file: &FileReadResult) -> String {
        self.run_outcome(file).await.into_output()
    }
}
