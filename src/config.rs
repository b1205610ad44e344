//! Run configuration.
//!
//! [`UserOptions`] is built once at start-up from command-line flags, the
//! process environment, and the settings file, then passed by reference to
//! everything that needs it.

use std::fmt;

use anyhow::{Context, Result};

use crate::openai::error::HuskyError;
use crate::openai::params::{CompletionOverrides, CompletionParams};
use crate::utils::settings::Settings;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default token marking a review that needs no changes.
pub const DEFAULT_PERFECT_KEYWORD: &str = "PERFECT";

/// Default file extensions considered for review and test generation.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "rs", "py", "go", "java"];

/// Default maximum characters of source embedded in one prompt.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 12_000;

/// Selects which remote call shape is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Generate unit tests with the single-turn completion endpoint.
    Test,
    /// Review changes with the chat completion endpoint.
    Review,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Test => write!(f, "test"),
            Mode::Review => write!(f, "review"),
        }
    }
}

/// Values supplied on the command line; `None` means "not given".
#[derive(Clone, Debug, Default)]
pub struct CliOverrides {
    /// OpenAI API key.
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: Option<String>,
    /// Raw typing toggle; only the literal `"false"` disables typing.
    pub review_typing: Option<String>,
    /// Keyword classifying a response as passing.
    pub perfect_keyword: Option<String>,
    /// File extensions to consider.
    pub extensions: Option<Vec<String>>,
    /// Maximum characters of source embedded in one prompt.
    pub max_prompt_chars: Option<usize>,
    /// Sampling parameter overrides.
    pub completion: CompletionOverrides,
}

/// Resolved configuration for one process.
#[derive(Clone, Debug)]
pub struct UserOptions {
    /// Remote call shape.
    pub mode: Mode,
    /// OpenAI API key.
    pub api_key: String,
    /// API base URL.
    pub base_url: String,
    /// Merged sampling parameters.
    pub completion: CompletionParams,
    /// Whether responses are replayed with the typing animation.
    pub review_typing: bool,
    /// Keyword classifying a response as passing.
    pub perfect_keyword: String,
    /// File extensions to consider, without the leading dot.
    pub extensions: Vec<String>,
    /// Maximum characters of source embedded in one prompt.
    pub max_prompt_chars: usize,
}

/// Returns whether the typing animation is enabled for a raw toggle value.
///
/// Only the exact string `"false"` disables it; absence enables it.
#[must_use]
pub fn typing_enabled(raw: Option<&str>) -> bool {
    raw != Some("false")
}

/// Returns whether a `DEBUG` environment value turns on verbose logging.
#[must_use]
pub fn debug_enabled(raw: Option<&str>) -> bool {
    matches!(raw, Some(value) if !value.is_empty() && value != "false" && value != "0")
}

/// Splits a comma-separated extension list, dropping blanks and leading dots.
#[must_use]
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
        .collect()
}

impl UserOptions {
    /// Resolves options from flags, the environment, and `settings`.
    pub fn resolve(mode: Mode, cli: CliOverrides, settings: &Settings) -> Result<Self> {
        Self::resolve_with(mode, cli, settings.completion.clone(), |key| {
            settings.get_env_var(key)
        })
    }

    /// Resolves options with an explicit variable lookup.
    ///
    /// Precedence: flag, then `lookup`, then `file_completion`, then defaults.
    pub fn resolve_with<F>(
        mode: Mode,
        cli: CliOverrides,
        file_completion: CompletionOverrides,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = cli
            .api_key
            .or_else(|| lookup("OPENAI_API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or(HuskyError::ApiKeyNotFound)?;

        let base_url = cli
            .base_url
            .or_else(|| lookup("OPENAI_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let env_completion = CompletionOverrides {
            model: lookup("OPENAI_MODEL"),
            ..Default::default()
        };
        let overrides = cli.completion.or(env_completion).or(file_completion);
        let completion = CompletionParams::defaults_for(mode).merge(&overrides);

        let review_typing = cli
            .review_typing
            .or_else(|| lookup("HUSKYGPT_REVIEW_TYPING"));

        let perfect_keyword = cli
            .perfect_keyword
            .or_else(|| lookup("HUSKYGPT_PERFECT_KEYWORD"))
            .unwrap_or_else(|| DEFAULT_PERFECT_KEYWORD.to_string());

        let extensions = cli
            .extensions
            .or_else(|| lookup("HUSKYGPT_EXTENSIONS").map(|raw| parse_extensions(&raw)))
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect());

        let max_prompt_chars = match cli.max_prompt_chars {
            Some(value) => value,
            None => match lookup("HUSKYGPT_MAX_PROMPT_CHARS") {
                Some(raw) => raw.trim().parse().with_context(|| {
                    format!("Invalid HUSKYGPT_MAX_PROMPT_CHARS value: {raw}")
                })?,
                None => DEFAULT_MAX_PROMPT_CHARS,
            },
        };

        Ok(Self {
            mode,
            api_key,
            base_url,
            completion,
            review_typing: typing_enabled(review_typing.as_deref()),
            perfect_keyword,
            extensions,
            max_prompt_chars,
        })
    }
}
