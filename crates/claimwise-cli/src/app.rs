//! Wiring of the store, model providers and engine from configuration.

use crate::error::{CliError, Result};
use claimwise_domain::traits::{AnomalyDetector, EmbeddingProvider, LlmProvider};
use claimwise_domain::{ClaimSubmission, RawClaim};
use claimwise_engine::{
    AnomalyConfig, ClaimwiseConfig, DecisionEngine, Explainer, FeedbackLoop,
};
use claimwise_llm::{MockProvider, OllamaEmbedding, OllamaProvider};
use claimwise_scorer::ZScoreAnomalyDetector;
use claimwise_store::{MockEmbeddingModel, SqliteStore, StoreError};
use std::fs;
use std::sync::Arc;

/// Everything a command needs: validated configuration and an open store.
pub struct App {
    /// Active configuration
    pub config: ClaimwiseConfig,

    /// Shared store
    pub store: Arc<SqliteStore>,
}

impl App {
    /// Validate the configuration and open the store it names.
    pub fn open(config: ClaimwiseConfig) -> Result<Self> {
        config.validate()?;
        let store = SqliteStore::new(&config.store.path, config.store.embedding_dimension)?;
        tracing::debug!(
            "Opened store at {} (dimension {})",
            config.store.path.display(),
            config.store.embedding_dimension
        );

        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Embedding provider selected by the configuration.
    pub fn embedder(&self) -> Arc<dyn EmbeddingProvider> {
        let providers = &self.config.providers;
        let dimension = self.config.store.embedding_dimension;

        if providers.mock {
            Arc::new(MockEmbeddingModel::new(dimension))
        } else {
            Arc::new(
                OllamaEmbedding::new(
                    providers.ollama_endpoint.as_str(),
                    providers.embedding_model.as_str(),
                    dimension,
                )
                .with_max_retries(providers.max_retries)
                .with_timeout(providers.timeout()),
            )
        }
    }

    fn llm(&self) -> Option<Arc<dyn LlmProvider>> {
        let providers = &self.config.providers;
        if providers.mock {
            return None;
        }

        Some(Arc::new(
            OllamaProvider::new(
                providers.ollama_endpoint.as_str(),
                providers.llm_model.as_str(),
            )
            .with_max_retries(providers.max_retries)
            .with_timeout(providers.timeout()),
        ))
    }

    /// Decision engine over the store.
    ///
    /// In mock mode explanations always use the templated text.
    pub fn engine(&self) -> Result<DecisionEngine<SqliteStore>> {
        let store = Arc::clone(&self.store);
        let mut engine = match self.llm() {
            Some(llm) => DecisionEngine::new(store, self.embedder(), llm, &self.config),
            None => DecisionEngine::new(
                store,
                self.embedder(),
                Arc::new(MockProvider::failing()),
                &self.config,
            )
            .with_explainer(Explainer::fallback_only()),
        };

        if let Some(detector) = load_anomaly_detector(&self.config.anomaly)? {
            engine = engine.with_anomaly_detector(detector);
        }
        Ok(engine)
    }

    /// Feedback loop over the store's pattern catalog.
    pub fn feedback(&self) -> FeedbackLoop<SqliteStore> {
        FeedbackLoop::new(
            Arc::clone(&self.store),
            &self.config.feedback,
            self.store.dimension(),
        )
    }

    /// Run a store operation on the blocking pool.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SqliteStore) -> std::result::Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| CliError::Task(e.to_string()))?;
        Ok(result?)
    }
}

/// Fit a z-score detector from the configured baseline file, if any.
fn load_anomaly_detector(config: &AnomalyConfig) -> Result<Option<Arc<dyn AnomalyDetector>>> {
    let Some(path) = &config.baseline else {
        return Ok(None);
    };

    let text = fs::read_to_string(path)?;
    let raw: Vec<RawClaim> = serde_json::from_str(&text)?;
    let baseline = raw
        .iter()
        .map(RawClaim::validate)
        .collect::<std::result::Result<Vec<ClaimSubmission>, _>>()?;

    let detector = ZScoreAnomalyDetector::fit(&baseline, config.z_threshold).map_err(|e| {
        CliError::Config(format!(
            "Invalid anomaly baseline {}: {}",
            path.display(),
            e
        ))
    })?;
    tracing::info!(
        "Fitted anomaly detector from {} baseline claims",
        baseline.len()
    );

    Ok(Some(Arc::new(detector)))
}
