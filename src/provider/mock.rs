//! Mock provider for testing
//!
//! Returns deterministic scores without making real API calls.
//! Essential for unit tests and CI pipelines.

use super::{Provider, ScoreRequest, TokenScores};
use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::{Arc, Mutex};

/// Leading whitespace stays attached to the following word, like BPE tokens
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\S+|\s+").unwrap());

/// Mock provider that scores every completion token the same
pub struct MockProvider {
    /// Queue of canned scores to return (FIFO)
    responses: Arc<Mutex<Vec<TokenScores>>>,
    /// Log-prob given to each token when the queue is empty
    default_logprob: f64,
    /// Track all requests made (for assertions)
    requests: Arc<Mutex<Vec<ScoreRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(vec![])),
            default_logprob: -1.0,
            requests: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Create with a queue of canned responses
    pub fn with_responses(responses: Vec<TokenScores>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::new()
        }
    }

    /// Set the per-token log-prob used when the queue is empty
    pub fn with_default_logprob(mut self, logprob: f64) -> Self {
        self.default_logprob = logprob;
        self
    }

    /// Get all requests made to this provider
    pub fn get_requests(&self) -> Vec<ScoreRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the last request made
    pub fn last_request(&self) -> Option<ScoreRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Split `text` into word tokens
    pub fn tokenize(text: &str) -> Vec<String> {
        WORD.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn score(&self, request: ScoreRequest) -> Result<TokenScores> {
        self.requests.lock().unwrap().push(request.clone());

        let queued = {
            let mut queue = self.responses.lock().unwrap();
            (!queue.is_empty()).then(|| queue.remove(0))
        };

        Ok(queued.unwrap_or_else(|| {
            let tokens = Self::tokenize(&request.completion);
            let logprobs = vec![Some(self.default_logprob); tokens.len()];
            TokenScores { tokens, logprobs }
        }))
    }
}
