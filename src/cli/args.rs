//! Flags shared by the review and test commands.

use clap::Args;

use crate::config::{parse_extensions, CliOverrides};
use crate::openai::params::CompletionOverrides;

/// API and sampling options.
#[derive(Args, Debug, Default, Clone)]
pub struct CommonArgs {
    /// OpenAI API key (defaults to OPENAI_API_KEY).
    #[arg(long)]
    pub api_key: Option<String>,

    /// API base URL (defaults to OPENAI_BASE_URL or https://api.openai.com).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Model to use (defaults to OPENAI_MODEL or a per-command default).
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature.
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Nucleus sampling probability mass.
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Stop sequence; may be repeated.
    #[arg(long)]
    pub stop: Vec<String>,

    /// Frequency penalty.
    #[arg(long)]
    pub frequency_penalty: Option<f32>,

    /// Presence penalty.
    #[arg(long)]
    pub presence_penalty: Option<f32>,

    /// Set to "false" to print responses without the typing animation.
    #[arg(long, value_name = "BOOL")]
    pub review_typing: Option<String>,

    /// Word that marks a response as passing.
    #[arg(long)]
    pub perfect_keyword: Option<String>,

    /// Comma-separated file extensions to consider.
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Maximum characters of source per prompt (defaults to 12000).
    #[arg(long)]
    pub max_prompt_chars: Option<usize>,
}

impl CommonArgs {
    /// Converts the flags into configuration overrides.
    pub fn into_overrides(self) -> CliOverrides {
        CliOverrides {
            api_key: self.api_key,
            base_url: self.base_url,
            review_typing: self.review_typing,
            perfect_keyword: self.perfect_keyword,
            extensions: self
                .extensions
                .map(|exts| parse_extensions(&exts.join(","))),
            max_prompt_chars: self.max_prompt_chars,
            completion: CompletionOverrides {
                model: self.model,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                top_p: self.top_p,
                stop: (!self.stop.is_empty()).then_some(self.stop),
                frequency_penalty: self.frequency_penalty,
                presence_penalty: self.presence_penalty,
            },
        }
    }
}
