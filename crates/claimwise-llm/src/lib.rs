//! Claimwise Model Provider Layer
//!
//! Implementations of the `LlmProvider` and `EmbeddingProvider` traits from
//! `claimwise-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic text generation for testing
//! - `OllamaProvider`: Local Ollama text generation
//! - `OllamaEmbedding`: Local Ollama embeddings
//!
//! # Examples
//!
//! ```
//! use claimwise_llm::MockProvider;
//! use claimwise_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Your claim has been approved.");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Your claim has been approved.");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use claimwise_domain::traits::{LlmProvider, ProviderError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::{OllamaEmbedding, OllamaProvider};

/// Errors that can occur during provider operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl From<LlmError> for ProviderError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::InvalidResponse(msg) => ProviderError::InvalidResponse(msg),
            other => ProviderError::Unavailable(other.to_string()),
        }
    }
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use claimwise_llm::MockProvider;
/// use claimwise_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.generate("prompt1").unwrap(), "response1");
///
/// let failing = MockProvider::failing();
/// assert!(failing.generate("anything").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Option<String>,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a provider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a provider that fails every prompt without a specific response
    pub fn failing() -> Self {
        Self {
            default_response: None,
            ..Self::new("")
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(prompt.into(), response.into());
        }
    }

    /// Number of times `generate` was called
    pub fn call_count(&self) -> usize {
        self.call_count.lock().map(|c| *c).unwrap_or(0)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if let Ok(mut count) = self.call_count.lock() {
            *count += 1;
        }

        let specific = self
            .responses
            .lock()
            .map_err(|_| ProviderError::Unavailable("mock state poisoned".to_string()))?
            .get(prompt)
            .cloned();

        specific
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| ProviderError::Unavailable("Mock provider configured to fail".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        assert_eq!(provider.generate("any prompt").unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");

        assert_eq!(provider.generate("hello").unwrap(), "world");
        assert_eq!(provider.generate("unknown").unwrap(), "Default mock response");
    }

    #[test]
    fn test_mock_provider_failing() {
        let mut provider = MockProvider::failing();
        provider.add_response("known", "ok");

        assert_eq!(provider.generate("known").unwrap(), "ok");
        assert!(matches!(
            provider.generate("other"),
            Err(ProviderError::Unavailable(_))
        ));
    }

    #[test]
    fn test_mock_provider_clone_shares_count() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_llm_error_conversion() {
        let e: ProviderError = LlmError::InvalidResponse("bad json".to_string()).into();
        assert_eq!(e, ProviderError::InvalidResponse("bad json".to_string()));

        let e: ProviderError = LlmError::ModelNotAvailable("llama3".to_string()).into();
        assert!(matches!(e, ProviderError::Unavailable(msg) if msg.contains("llama3")));
    }
}
