//! Ollama Provider Implementation
//!
//! Text generation and embeddings against a local Ollama instance.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama API
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Blocking trait implementations for the decision pipeline
//!
//! # Examples
//!
//! ```no_run
//! use claimwise_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3");
//!
//! // `generate` is async; the `LlmProvider` trait offers the blocking form
//! ```

use crate::LlmError;
use claimwise_domain::traits::{EmbeddingProvider, LlmProvider, ProviderError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// POST a JSON body with retries and exponential backoff (1s, 2s, 4s...)
async fn post_json<Req, Resp>(
    client: &reqwest::Client,
    url: &str,
    model: &str,
    body: &Req,
    max_retries: u32,
) -> Result<Resp, LlmError>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries {
        match client.post(url).json(body).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    return response.json::<Resp>().await.map_err(|e| {
                        LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                    });
                } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                    return Err(LlmError::ModelNotAvailable(model.to_string()));
                } else {
                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(LlmError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
            }
            Err(e) => {
                last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
            }
        }

        attempts += 1;
        if attempts < max_retries {
            tracing::debug!("Retrying {} (attempt {} of {})", url, attempts + 1, max_retries);
            let delay = Duration::from_secs(2u64.pow(attempts - 1));
            tokio::time::sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
}

/// Drive a future to completion from synchronous code
///
/// Uses the ambient runtime when called from a blocking thread of a tokio
/// runtime (e.g. inside `spawn_blocking`); otherwise starts a private
/// current-thread runtime. Must not be called from an async worker thread.
fn block_on<F: Future>(future: F) -> Result<F::Output, LlmError> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Ok(handle.block_on(future)),
        Err(_) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;
            Ok(runtime.block_on(future))
        }
    }
}

/// Ollama API provider for explanation text
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the per-request HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Generate text using the Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Response format is invalid
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response: GenerateResponse =
            post_json(&self.client, &url, &self.model, &body, self.max_retries).await?;
        Ok(response.response)
    }
}

impl LlmProvider for OllamaProvider {
    fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        block_on(OllamaProvider::generate(self, prompt))?.map_err(ProviderError::from)
    }
}

/// Ollama API provider for claim embeddings
///
/// Every vector returned must have the configured dimension; a model that
/// answers with a different length is reported as an invalid response.
pub struct OllamaEmbedding {
    endpoint: String,
    model: String,
    dimension: usize,
    client: reqwest::Client,
    max_retries: u32,
}

impl OllamaEmbedding {
    /// Create a new embedding provider
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use claimwise_llm::OllamaEmbedding;
    ///
    /// let embedder = OllamaEmbedding::new("http://localhost:11434", "nomic-embed-text", 768);
    /// ```
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimension,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the per-request HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Embed text using the Ollama API
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let url = format!("{}/api/embeddings", self.endpoint);
        let body = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response: EmbeddingResponse =
            post_json(&self.client, &url, &self.model, &body, self.max_retries).await?;

        if response.embedding.len() != self.dimension {
            return Err(LlmError::InvalidResponse(format!(
                "Expected {} dimensions, got {}",
                self.dimension,
                response.embedding.len()
            )));
        }

        Ok(response.embedding)
    }
}

impl EmbeddingProvider for OllamaEmbedding {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        block_on(OllamaEmbedding::embed(self, text))?.map_err(ProviderError::from)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
