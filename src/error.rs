//! Error types with fix suggestions
//!
//! A template that cannot match is not an error: matching reports that with
//! `None`. The variants here cover contract violations (filling a value the
//! template cannot render, invalid regexes) and the collaborator layers.

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

pub type Result<T> = std::result::Result<T, FabError>;

#[derive(Error, Debug)]
pub enum FabError {
    // ─────────────────────────────────────────────────────────────
    // Construction errors (FAB-001)
    // ─────────────────────────────────────────────────────────────

    #[error("FAB-001: Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // Fill domain errors (FAB-010 to FAB-012)
    // ─────────────────────────────────────────────────────────────

    #[error("FAB-010: {template} expects {expected} items, got {found}")]
    ArityMismatch {
        template: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("FAB-011: {template} cannot fill a {found} value (expected {expected})")]
    TypeMismatch {
        template: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("FAB-012: Value {value} is not one of the declared options")]
    UnknownOption { value: String },

    // ─────────────────────────────────────────────────────────────
    // Scoring errors (FAB-020)
    // ─────────────────────────────────────────────────────────────

    #[error("FAB-020: Partial fill ({prompt_len} bytes) is not a prefix of the full fill ({full_len} bytes)")]
    PrefixMismatch { prompt_len: usize, full_len: usize },

    // ─────────────────────────────────────────────────────────────
    // Collaborators (FAB-030 to FAB-040)
    // ─────────────────────────────────────────────────────────────

    #[error("FAB-030: Provider error: {0}")]
    Provider(String),

    #[error("FAB-040: Config error: {reason}")]
    Config { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FixSuggestion for FabError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            FabError::InvalidPattern { .. } => {
                Some("Check the regular expression syntax (regex crate dialect, no look-around)")
            }
            FabError::ArityMismatch { .. } => {
                Some("Pass exactly one value per Append slot")
            }
            FabError::TypeMismatch { .. } => {
                Some("Check the shape of the data against the template tree")
            }
            FabError::UnknownOption { .. } => {
                Some("Use one of the values the Choice was built with, or null")
            }
            FabError::PrefixMismatch { .. } => {
                Some("The partial data must only leave trailing slots empty (use null for the scored slot)")
            }
            FabError::Provider(_) => {
                Some("Check OPENAI_API_KEY is set and the model supports echo + logprobs")
            }
            FabError::Config { .. } => Some("Check the YAML config file and PROMPT_FAB_* env vars"),
            FabError::Io(_) => Some("Check file path and permissions"),
            FabError::Json(_) => Some("Check the input is valid JSON"),
            FabError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
        }
    }
}
