//! The fraud scorer
//!
//! Every call appends one history row for the applicant before counting
//! recent filings, so the current filing is part of its own temporal check.

use crate::anomaly::NoAnomalyDetector;
use crate::hard_rules::HardRuleSet;
use crate::{fuse_score, ScorerConfig, ScorerError};
use claimwise_domain::traits::{AnomalyDetector, ClaimHistoryStore, EmbeddingProvider, PatternCatalog};
use claimwise_domain::{ClaimHistoryRecord, ClaimSubmission, FraudIndicators, PatternMatch};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default time budget for embedding and anomaly calls
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of analysing one claim
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FraudAnalysis {
    /// Fused score in [0, 1], two decimals
    pub score: f64,

    /// Catalog patterns above the similarity threshold, most similar first
    pub matched_patterns: Vec<PatternMatch>,

    /// Names of violated hard rules, in declaration order
    pub hard_rule_violations: Vec<String>,

    /// Excessive filing frequency
    pub temporal_red_flag: bool,

    /// Statistical outlier
    pub is_anomaly: bool,

    /// Filings inside the temporal window, including this one
    pub recent_filings: usize,

    /// Embedding used for pattern matching (zeros when the provider failed)
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

impl FraudAnalysis {
    /// Indicator summary for the decision
    pub fn indicators(&self) -> FraudIndicators {
        FraudIndicators {
            hard_rule_violations: self.hard_rule_violations.clone(),
            matched_patterns: self
                .matched_patterns
                .iter()
                .map(|m| m.pattern.description.clone())
                .collect(),
            temporal_red_flag: self.temporal_red_flag,
            is_anomaly: self.is_anomaly,
        }
    }
}

/// Scores claims for fraud risk
///
/// # Examples
///
/// ```no_run
/// use claimwise_scorer::{FraudScorer, ScorerConfig};
/// use claimwise_store::{MockEmbeddingModel, SqliteStore};
/// use claimwise_domain::ClaimSubmission;
/// use std::sync::Arc;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(SqliteStore::new(":memory:", 384)?);
/// let scorer = FraudScorer::new(store, Arc::new(MockEmbeddingModel::new(384)), ScorerConfig::default());
///
/// let claim = ClaimSubmission::new("1234", "Acme Corp", "layoff", 5000.0, 12)?;
/// let analysis = scorer.analyze(&claim).await?;
/// assert!(analysis.score <= 1.0);
/// # Ok(())
/// # }
/// ```
pub struct FraudScorer<S> {
    store: Arc<S>,
    embedder: Arc<dyn EmbeddingProvider>,
    anomaly: Arc<dyn AnomalyDetector>,
    hard_rules: HardRuleSet,
    config: ScorerConfig,
    provider_timeout: Duration,
}

impl<S> FraudScorer<S>
where
    S: ClaimHistoryStore + PatternCatalog + Send + Sync + 'static,
{
    /// Create a scorer with the no-op anomaly detector
    pub fn new(store: Arc<S>, embedder: Arc<dyn EmbeddingProvider>, config: ScorerConfig) -> Self {
        Self {
            store,
            embedder,
            anomaly: Arc::new(NoAnomalyDetector),
            hard_rules: HardRuleSet::from_config(&config),
            config,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Replace the anomaly detector
    pub fn with_anomaly_detector(mut self, detector: Arc<dyn AnomalyDetector>) -> Self {
        self.anomaly = detector;
        self
    }

    /// Set the time budget for each provider call
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Scorer configuration
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Analyse a claim filed now
    pub async fn analyze(&self, claim: &ClaimSubmission) -> Result<FraudAnalysis, ScorerError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.analyze_at(claim, now).await
    }

    /// Analyse a claim filed at `filed_at` (Unix seconds)
    ///
    /// # Errors
    ///
    /// Store failures and failed blocking tasks. Provider failures never
    /// surface; they fall back to a zero embedding or `false`.
    pub async fn analyze_at(
        &self,
        claim: &ClaimSubmission,
        filed_at: u64,
    ) -> Result<FraudAnalysis, ScorerError> {
        let hard_rule_violations = self.hard_rules.violations(claim);
        let embedding = self.embed(claim).await;

        let record = ClaimHistoryRecord::new(
            claim.ssn_last4().clone(),
            claim.employer(),
            filed_at,
            embedding.clone(),
        );
        let store = Arc::clone(&self.store);
        blocking(move || store.append_history(&record))
            .await?
            .map_err(|e| {
                tracing::error!("Failed to append claim history: {}", e);
                ScorerError::store(e)
            })?;

        let since = filed_at.saturating_sub(self.config.temporal_window_secs());
        let applicant = claim.ssn_last4().clone();
        let store = Arc::clone(&self.store);
        let count_task = blocking(move || store.count_filed_since(&applicant, since));

        let query = embedding.clone();
        let threshold = self.config.similarity_threshold;
        let store = Arc::clone(&self.store);
        let pattern_task = blocking(move || store.similar_patterns(&query, threshold));

        let (recent, matches, is_anomaly) =
            tokio::join!(count_task, pattern_task, self.check_anomaly(claim));

        let recent_filings = recent?.map_err(|e| {
            tracing::error!("Failed to count recent filings: {}", e);
            ScorerError::store(e)
        })?;
        let matched_patterns = matches?.map_err(|e| {
            tracing::error!("Failed to scan fraud patterns: {}", e);
            ScorerError::store(e)
        })?;

        let temporal_red_flag = recent_filings > self.config.temporal_threshold;
        let score = fuse_score(
            matched_patterns.iter().map(|m| m.pattern.severity),
            !hard_rule_violations.is_empty(),
            temporal_red_flag,
            is_anomaly,
        );

        tracing::debug!(
            "Fraud analysis for {}: score {}, {} hard rule(s), {} pattern(s), {} recent filing(s), anomaly {}",
            claim.ssn_last4(),
            score,
            hard_rule_violations.len(),
            matched_patterns.len(),
            recent_filings,
            is_anomaly
        );

        Ok(FraudAnalysis {
            score,
            matched_patterns,
            hard_rule_violations,
            temporal_red_flag,
            is_anomaly,
            recent_filings,
            embedding,
        })
    }

    /// Embed the claim, degrading to a zero vector on any provider failure
    async fn embed(&self, claim: &ClaimSubmission) -> Vec<f32> {
        let dimension = self.embedder.dimension();
        let embedder = Arc::clone(&self.embedder);
        let text = claim.context_text();

        let outcome = tokio::time::timeout(
            self.provider_timeout,
            tokio::task::spawn_blocking(move || embedder.embed(&text)),
        )
        .await;

        match outcome {
            Ok(Ok(Ok(embedding))) if embedding.len() == dimension => embedding,
            Ok(Ok(Ok(embedding))) => {
                tracing::warn!(
                    "Embedding provider returned {} dimensions, expected {}; using zero vector",
                    embedding.len(),
                    dimension
                );
                vec![0.0; dimension]
            }
            Ok(Ok(Err(e))) => {
                tracing::warn!("Embedding failed: {}; using zero vector", e);
                vec![0.0; dimension]
            }
            Ok(Err(e)) => {
                tracing::warn!("Embedding task failed: {}; using zero vector", e);
                vec![0.0; dimension]
            }
            Err(_) => {
                tracing::warn!("Embedding timed out after {:?}; using zero vector", self.provider_timeout);
                vec![0.0; dimension]
            }
        }
    }

    /// Ask the anomaly detector, degrading to `false` on any failure
    async fn check_anomaly(&self, claim: &ClaimSubmission) -> bool {
        let detector = Arc::clone(&self.anomaly);
        let claim = claim.clone();

        let outcome = tokio::time::timeout(
            self.provider_timeout,
            tokio::task::spawn_blocking(move || detector.is_anomaly(&claim)),
        )
        .await;

        match outcome {
            Ok(Ok(Ok(flag))) => flag,
            Ok(Ok(Err(e))) => {
                tracing::warn!("Anomaly detection failed: {}; assuming no anomaly", e);
                false
            }
            Ok(Err(e)) => {
                tracing::warn!("Anomaly task failed: {}; assuming no anomaly", e);
                false
            }
            Err(_) => {
                tracing::warn!("Anomaly detection timed out; assuming no anomaly");
                false
            }
        }
    }
}

/// Run a store call on the blocking pool
async fn blocking<T, F>(f: F) -> Result<T, ScorerError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ScorerError::Task(e.to_string()))
}
