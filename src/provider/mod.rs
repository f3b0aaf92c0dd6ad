//! # Log-probability Providers
//!
//! Scoring a template slot means asking a language model how likely the
//! filled slot is as a continuation of everything before it. The template
//! is filled twice, once with the slot left open (`partial`) and once with
//! the candidate value (`full`). The partial text must be a prefix of the
//! full text; the remainder is the completion being scored.
//!
//! - [`Provider`] - trait for one scoring request
//! - [`OpenAIProvider`] - legacy completions API with `echo` + `logprobs`
//! - [`MockProvider`] - deterministic scores for tests
//!
//! ```rust
//! use prompt_fab::provider::completion_start_index;
//!
//! // Tokens "Q", ":", " Yes" with the prompt "Q:" (2 chars)
//! assert_eq!(completion_start_index(&[0, 1, 2], 2), 2);
//! ```

mod mock;
mod openai;

pub use mock::MockProvider;
pub use openai::OpenAIProvider;

use crate::config::FabConfig;
use crate::error::FabError;
use crate::template::Template;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

// ============================================================================
// PROVIDER TRAIT
// ============================================================================

/// A model that can score a completion given a prompt
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider name (e.g., "openai", "mock")
    fn name(&self) -> &str;

    /// Issue one request and return the completion's tokens and log-probs
    async fn score(&self, request: ScoreRequest) -> Result<TokenScores>;

    /// Check if this provider is usable (e.g., API key set)
    fn is_available(&self) -> bool {
        true
    }
}

// ============================================================================
// REQUEST/RESPONSE TYPES
// ============================================================================

/// Prompt prefix plus the completion whose likelihood is wanted
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRequest {
    pub prompt: String,
    pub completion: String,
    /// Empty means the provider's default model
    pub model: String,
}

impl ScoreRequest {
    pub fn new(prompt: impl Into<String>, completion: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            completion: completion.into(),
            model: String::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Text sent to the model
    pub fn full_text(&self) -> String {
        format!("{}{}", self.prompt, self.completion)
    }
}

/// Completion tokens with their conditional log-probabilities
///
/// A log-prob is `None` for a token the model had no context for (the very
/// first token of the echoed text).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenScores {
    pub tokens: Vec<String>,
    pub logprobs: Vec<Option<f64>>,
}

impl TokenScores {
    /// Sum of the known log-probs
    pub fn total_logprob(&self) -> f64 {
        self.logprobs.iter().flatten().sum()
    }
}

/// Index of the first token belonging to the completion
///
/// `text_offsets` are the character offsets of each echoed token and
/// `prompt_chars` the prompt length in characters. A token that starts
/// inside the prompt and runs past its end is counted as part of the
/// completion. With no token at or past the boundary, the last token is used.
pub fn completion_start_index(text_offsets: &[usize], prompt_chars: usize) -> usize {
    for (i, &offset) in text_offsets.iter().enumerate() {
        if offset == prompt_chars {
            return i;
        }
        if offset > prompt_chars {
            return i.saturating_sub(1);
        }
    }
    text_offsets.len().saturating_sub(1)
}

// ============================================================================
// TEMPLATE SCORING
// ============================================================================

/// Score the part of `template` that `full` fills beyond `partial`
///
/// Makes exactly one provider request.
pub async fn score_template(
    provider: &dyn Provider,
    template: &dyn Template,
    partial: &Value,
    full: &Value,
    model: &str,
) -> Result<TokenScores> {
    let prompt = template.fill(partial)?;
    let full_text = template.fill(full)?;
    let Some(completion) = full_text.strip_prefix(prompt.as_str()) else {
        return Err(FabError::PrefixMismatch {
            prompt_len: prompt.len(),
            full_len: full_text.len(),
        }
        .into());
    };

    tracing::debug!(
        provider = provider.name(),
        prompt_len = prompt.len(),
        completion = %completion,
        "Scoring template completion"
    );

    let request = ScoreRequest::new(prompt.as_str(), completion).with_model(model);
    provider.score(request).await
}

// ============================================================================
// PROVIDER FACTORY
// ============================================================================

/// Create the provider named in `config`
///
/// | Name | Requires |
/// |------|----------|
/// | `openai` | API key (config, key file or `OPENAI_API_KEY`) |
/// | `mock` | Nothing |
pub fn create_provider(config: &FabConfig) -> Result<Box<dyn Provider>> {
    match config.provider.to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAIProvider::from_config(config)?)),
        "mock" => Ok(Box::new(MockProvider::new())),
        other => Err(FabError::Config {
            reason: format!("Unknown provider: '{}'. Available: openai, mock", other),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_index_exact_boundary() {
        assert_eq!(completion_start_index(&[0, 3, 5, 9], 5), 2);
    }

    #[test]
    fn test_start_index_straddling_token() {
        // Token at 3 covers the boundary at 4
        assert_eq!(completion_start_index(&[0, 3, 6], 4), 1);
    }

    #[test]
    fn test_start_index_past_end() {
        assert_eq!(completion_start_index(&[0, 3], 10), 1);
        assert_eq!(completion_start_index(&[], 10), 0);
    }

    #[test]
    fn test_start_index_never_underflows() {
        assert_eq!(completion_start_index(&[2, 4], 0), 0);
    }

    #[test]
    fn test_total_logprob_skips_unknown() {
        let scores = TokenScores {
            tokens: vec!["a".into(), "b".into(), "c".into()],
            logprobs: vec![None, Some(-1.5), Some(-0.5)],
        };
        assert_eq!(scores.total_logprob(), -2.0);
    }

    #[test]
    fn test_request_full_text() {
        let req = ScoreRequest::new("A: ", "Yes").with_model("davinci-002");
        assert_eq!(req.full_text(), "A: Yes");
        assert_eq!(req.model, "davinci-002");
    }

    #[test]
    fn test_create_provider_by_name() {
        let mut config = FabConfig::default();
        config.provider = "mock".to_string();
        assert_eq!(create_provider(&config).unwrap().name(), "mock");

        config.provider = "nope".to_string();
        assert!(create_provider(&config).is_err());

        config.provider = "openai".to_string();
        config.api_key = Some("sk-test".to_string());
        assert_eq!(create_provider(&config).unwrap().name(), "openai");
    }
}
