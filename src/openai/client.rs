//! OpenAI completion client.
//!
//! Both call shapes (single-turn completion and chat completion) sit behind
//! [`CompletionClient::complete`]; which one is used is fixed by the [`Mode`]
//! the client was built with.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Mode, UserOptions};
use crate::openai::error::HuskyError;
use crate::openai::params::{ChatCompletionParams, CompletionParams, TextCompletionParams};

/// HTTP request timeout for API calls.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Endpoint for single-turn completions.
const COMPLETIONS_PATH: &str = "/v1/completions";

/// Endpoint for chat completions.
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Trait for completion clients.
pub trait CompletionClient: Send + Sync {
    /// Sends `prompt` to the model and returns its text answer.
    ///
    /// An absent answer is returned as an empty string.
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// Token usage reported by the API.
#[derive(Deserialize, Debug)]
#[allow(dead_code)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

/// Single-turn completion choice.
#[derive(Deserialize, Debug)]
struct TextChoice {
    #[serde(default)]
    text: Option<String>,
}

/// Single-turn completion response.
#[derive(Deserialize, Debug)]
struct TextCompletionResponse {
    #[serde(default)]
    choices: Vec<TextChoice>,
    usage: Option<Usage>,
}

/// Chat response message.
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completion choice.
#[derive(Deserialize, Debug)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

/// Chat completion response.
#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

/// Builds an HTTP client with the standard request timeout.
pub(crate) fn build_http_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Checks an HTTP response for error status and returns a structured error
/// if non-success.
pub(crate) async fn check_error_response(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response.text().await.unwrap_or_else(|e| {
        debug!("Failed to read error response body: {e}");
        String::new()
    });
    Err(HuskyError::ApiRequestFailed(format!("HTTP {status}: {error_text}")).into())
}

/// OpenAI API client.
pub struct OpenAiClient {
    /// HTTP client for API requests
    client: Client,
    /// API key sent as a bearer token
    api_key: String,
    /// Base URL for the API (e.g., "https://api.openai.com")
    base_url: String,
    /// Selects the call shape
    mode: Mode,
    /// Merged sampling parameters
    params: CompletionParams,
}

impl OpenAiClient {
    /// Creates a new client.
    pub fn new(
        api_key: String,
        base_url: String,
        mode: Mode,
        params: CompletionParams,
    ) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            api_key,
            base_url,
            mode,
            params,
        })
    }

    /// Creates a client from resolved user options.
    pub fn from_options(options: &UserOptions) -> Result<Self> {
        Self::new(
            options.api_key.clone(),
            options.base_url.clone(),
            options.mode,
            options.completion.clone(),
        )
    }

    /// Builds the full URL for an API path.
    fn endpoint(&self, path: &str) -> String {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));
        debug!(base_url = %self.base_url, full_url = %url, "Constructed OpenAI API URL");
        url
    }

    /// POSTs `body` to `path` and decodes the JSON reply.
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let url = self.endpoint(path);
        info!(url = %url, model = %self.params.model, "Sending request to OpenAI API");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| HuskyError::NetworkError(e.to_string()))?;

        let response = check_error_response(response).await?;

        response
            .json::<R>()
            .await
            .map_err(|e| HuskyError::InvalidResponseFormat(e.to_string()).into())
    }

    /// Single-turn completion: returns `choices[0].text`.
    async fn text_completion(&self, prompt: &str) -> Result<String> {
        let request = TextCompletionParams::new(&self.params, prompt);
        let response: TextCompletionResponse = self.post(COMPLETIONS_PATH, &request).await?;

        debug!(
            choice_count = response.choices.len(),
            usage = ?response.usage,
            "Received completion response"
        );

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.text)
            .unwrap_or_default())
    }

    /// Chat completion: returns `choices[0].message.content`.
    async fn chat_completion(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionParams::from(&self.params).with_user_prompt(prompt);
        let response: ChatCompletionResponse = self.post(CHAT_COMPLETIONS_PATH, &request).await?;

        debug!(
            choice_count = response.choices.len(),
            usage = ?response.usage,
            "Received chat completion response"
        );

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default())
    }
}

impl CompletionClient for OpenAiClient {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let result = match self.mode {
                Mode::Test => self.text_completion(prompt).await,
                Mode::Review => self.chat_completion(prompt).await,
            };
            if let Ok(ref text) = result {
                debug!(response_len = text.len(), mode = %self.mode, "Completion finished");
            }
            result
        })
    }
}
