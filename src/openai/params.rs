//! Sampling parameters shared by the completion and chat completion calls.

use serde::{Deserialize, Serialize};

use crate::config::Mode;

/// Default model for the single-turn completion endpoint.
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";

/// Default model for the chat completion endpoint.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// Default upper bound on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Merged sampling configuration applied to every remote call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionParams {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Nucleus sampling probability mass.
    pub top_p: f32,
    /// Sequences at which generation stops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Penalty for frequently repeated tokens.
    pub frequency_penalty: f32,
    /// Penalty for tokens already present.
    pub presence_penalty: f32,
}

/// User-supplied overrides; unset fields keep the default.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CompletionOverrides {
    /// Model identifier.
    #[serde(default)]
    pub model: Option<String>,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Nucleus sampling probability mass.
    #[serde(default)]
    pub top_p: Option<f32>,
    /// Sequences at which generation stops.
    #[serde(default)]
    pub stop: Option<Vec<String>>,
    /// Penalty for frequently repeated tokens.
    #[serde(default)]
    pub frequency_penalty: Option<f32>,
    /// Penalty for tokens already present.
    #[serde(default)]
    pub presence_penalty: Option<f32>,
}

impl CompletionOverrides {
    /// Fills every unset field from `fallback`.
    #[must_use]
    pub fn or(self, fallback: CompletionOverrides) -> Self {
        Self {
            model: self.model.or(fallback.model),
            temperature: self.temperature.or(fallback.temperature),
            max_tokens: self.max_tokens.or(fallback.max_tokens),
            top_p: self.top_p.or(fallback.top_p),
            stop: self.stop.or(fallback.stop),
            frequency_penalty: self.frequency_penalty.or(fallback.frequency_penalty),
            presence_penalty: self.presence_penalty.or(fallback.presence_penalty),
        }
    }
}

impl CompletionParams {
    /// Returns the static defaults for a mode.
    #[must_use]
    pub fn defaults_for(mode: Mode) -> Self {
        let model = match mode {
            Mode::Test => DEFAULT_COMPLETION_MODEL,
            Mode::Review => DEFAULT_CHAT_MODEL,
        };

        Self {
            model: model.to_string(),
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: 1.0,
            stop: None,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }

    /// Applies `overrides` on top of these parameters.
    #[must_use]
    pub fn merge(&self, overrides: &CompletionOverrides) -> Self {
        Self {
            model: overrides.model.clone().unwrap_or_else(|| self.model.clone()),
            temperature: overrides.temperature.unwrap_or(self.temperature),
            max_tokens: overrides.max_tokens.unwrap_or(self.max_tokens),
            top_p: overrides.top_p.unwrap_or(self.top_p),
            stop: overrides.stop.clone().or_else(|| self.stop.clone()),
            frequency_penalty: overrides.frequency_penalty.unwrap_or(self.frequency_penalty),
            presence_penalty: overrides.presence_penalty.unwrap_or(self.presence_penalty),
        }
    }
}

/// A single chat message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatMessage {
    /// Author role (`user`, `system`, `assistant`).
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Chat completion request body: the shared sampling fields plus messages.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatCompletionParams {
    #[serde(flatten)]
    sampling: CompletionParams,
    messages: Vec<ChatMessage>,
}

impl From<&CompletionParams> for ChatCompletionParams {
    fn from(params: &CompletionParams) -> Self {
        Self {
            sampling: params.clone(),
            messages: Vec::new(),
        }
    }
}

impl ChatCompletionParams {
    /// Sets the conversation to a single user turn.
    #[must_use]
    pub fn with_user_prompt(mut self, prompt: &str) -> Self {
        self.messages = vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];
        self
    }
}

/// Single-turn completion request body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextCompletionParams {
    #[serde(flatten)]
    sampling: CompletionParams,
    prompt: String,
}

impl TextCompletionParams {
    /// Builds a request seeded with `prompt`.
    #[must_use]
    pub fn new(params: &CompletionParams, prompt: &str) -> Self {
        Self {
            sampling: params.clone(),
            prompt: prompt.to_string(),
        }
    }
}
