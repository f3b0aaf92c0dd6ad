//! Configuration for the scoring provider
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variables (`OPENAI_API_KEY`, `PROMPT_FAB_PROVIDER`,
//!    `PROMPT_FAB_MODEL`, `PROMPT_FAB_BASE_URL`)
//! 2. YAML config file
//! 3. Defaults

use crate::error::{FabError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROVIDER: &str = "openai";
/// Completions model that still supports `echo` with `logprobs`
pub const DEFAULT_MODEL: &str = "davinci-002";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FabConfig {
    /// Provider name (openai, mock)
    pub provider: String,

    /// Default model for scoring requests
    pub model: String,

    /// API root for the provider
    pub base_url: String,

    /// API key (sk-...)
    pub api_key: Option<String>,

    /// File holding the API key, used when `api_key` is unset
    pub api_key_file: Option<PathBuf>,

    /// Request timeout
    pub timeout_secs: u64,
}

impl Default for FabConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_key_file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl FabConfig {
    /// Load configuration from a YAML file
    ///
    /// `None` gives the defaults. Missing keys fall back to their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|e| FabError::Config {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Self = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %path.display(), provider = %config.provider, "Loaded config");
        Ok(config)
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over config file values.
    pub fn with_env(mut self) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        if let Some(key) = var("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(provider) = var("PROMPT_FAB_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = var("PROMPT_FAB_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = var("PROMPT_FAB_BASE_URL") {
            self.base_url = base_url;
        }
        self
    }

    /// Check the settings a provider relies on
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| FabError::Config {
            reason: format!("Invalid base_url '{}': {}", self.base_url, e),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FabError::Config {
                reason: format!("base_url must be http or https, got '{}'", url.scheme()),
            });
        }
        if self.timeout_secs == 0 {
            return Err(FabError::Config {
                reason: "timeout_secs must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// API key from the config, else from `api_key_file`
    ///
    /// Merge the environment first with [`FabConfig::with_env`].
    pub fn resolve_api_key(&self) -> Result<Option<String>> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(Some(key.clone()));
        }
        let Some(path) = &self.api_key_file else {
            return Ok(None);
        };
        let key = fs::read_to_string(path).map_err(|e| FabError::Config {
            reason: format!("Failed to read API key file {}: {}", path.display(), e),
        })?;
        let key = key.trim();
        Ok((!key.is_empty()).then(|| key.to_string()))
    }
}

/// Mask an API key for display
///
/// Shows first N chars + asterisks, e.g. "sk-proj***"
pub fn mask_api_key(key: &str, visible_chars: usize) -> String {
    if key.is_empty() {
        return String::new();
    }
    let visible: String = key.chars().take(visible_chars).collect();
    format!("{}***", visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = FabConfig::default();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_none_is_default() {
        assert_eq!(FabConfig::load(None).unwrap(), FabConfig::default());
    }

    #[test]
    fn test_load_partial_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fab.yaml");
        fs::write(&path, "provider: mock\nmodel: babbage-002\n").unwrap();

        let config = FabConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.provider, "mock");
        assert_eq!(config.model, "babbage-002");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FabConfig::load(Some(Path::new("/nonexistent/fab.yaml"))).unwrap_err();
        assert!(matches!(err, FabError::Config { .. }));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fab.yaml");
        fs::write(&path, "timeout_secs: [not, a, number]\n").unwrap();
        assert!(matches!(
            FabConfig::load(Some(path.as_path())).unwrap_err(),
            FabError::Yaml(_)
        ));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = FabConfig::default();
        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.base_url = "http://localhost:11434/v1".to_string();
        assert!(config.validate().is_ok());

        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_file_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let key_path = temp_dir.path().join("openai_api_key.txt");
        fs::write(&key_path, "sk-from-file\n").unwrap();

        let mut config = FabConfig::default();
        config.api_key_file = Some(key_path);
        assert_eq!(config.resolve_api_key().unwrap().as_deref(), Some("sk-from-file"));

        config.api_key = Some("sk-inline".to_string());
        assert_eq!(config.resolve_api_key().unwrap().as_deref(), Some("sk-inline"));
    }

    #[test]
    fn test_api_key_file_missing() {
        let mut config = FabConfig::default();
        config.api_key_file = Some(PathBuf::from("/nonexistent/key.txt"));
        assert!(config.resolve_api_key().is_err());
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("sk-proj-abcdef", 7), "sk-proj***");
        assert_eq!(mask_api_key("abc", 10), "abc***");
        assert_eq!(mask_api_key("", 5), "");
    }
}
