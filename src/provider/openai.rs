//! OpenAI provider using the legacy Completions API
//!
//! Scores by echoing `prompt + completion` with `max_tokens = 0` and
//! `logprobs = 0`, then keeps only the tokens past the prompt.
//! Requires an API key (config, key file, or `OPENAI_API_KEY`).

use super::{completion_start_index, Provider, ScoreRequest, TokenScores};
use crate::config::FabConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI provider that uses the Completions endpoint
pub struct OpenAIProvider {
    /// HTTP client
    client: reqwest::Client,
    /// API key
    api_key: String,
    /// API root, e.g. `https://api.openai.com/v1`
    base_url: String,
    /// Model used when the request does not name one
    model: String,
}

impl OpenAIProvider {
    /// Create from configuration
    pub fn from_config(config: &FabConfig) -> Result<Self> {
        let api_key = config
            .resolve_api_key()?
            .context("No OpenAI API key: set OPENAI_API_KEY, api_key or api_key_file")?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Create with a specific API key and default settings
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let defaults = FabConfig::default();
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: defaults.base_url,
            model: defaults.model,
        }
    }

    /// Set the default model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/completions", self.base_url)
    }

    fn build_payload(&self, request: &ScoreRequest) -> CompletionRequest {
        CompletionRequest {
            model: if request.model.is_empty() {
                self.model.clone()
            } else {
                request.model.clone()
            },
            prompt: request.full_text(),
            max_tokens: 0,
            logprobs: 0,
            echo: true,
            n: 1,
        }
    }
}

/// Slice the echoed tokens down to the completion
fn completion_scores(logprobs: EchoLogprobs, prompt: &str) -> TokenScores {
    let start = completion_start_index(&logprobs.text_offset, prompt.chars().count());
    TokenScores {
        tokens: logprobs.tokens.into_iter().skip(start).collect(),
        logprobs: logprobs.token_logprobs.into_iter().skip(start).collect(),
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn score(&self, request: ScoreRequest) -> Result<TokenScores> {
        let payload = self.build_payload(&request);

        tracing::debug!(
            provider = "openai",
            model = %payload.model,
            prompt_len = request.prompt.len(),
            completion_len = request.completion.len(),
            "Sending request to OpenAI API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                provider = "openai",
                status = %status,
                error = %error_text,
                "OpenAI API error"
            );
            return Err(crate::error::FabError::Provider(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            ))
            .into());
        }

        let api_response: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        let logprobs = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.logprobs)
            .context("OpenAI API response has no logprobs")?;

        let scores = completion_scores(logprobs, &request.prompt);

        tracing::debug!(
            provider = "openai",
            tokens = scores.tokens.len(),
            "OpenAI API response received"
        );

        Ok(scores)
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ============================================================================
// API TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    prompt: String,
    max_tokens: u32,
    logprobs: u32,
    echo: bool,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    logprobs: Option<EchoLogprobs>,
}

#[derive(Debug, Deserialize)]
struct EchoLogprobs {
    tokens: Vec<String>,
    token_logprobs: Vec<Option<f64>>,
    text_offset: Vec<usize>,
}

// ============================================================================
// TESTS
// ============================================================================
