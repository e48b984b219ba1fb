//! The decision orchestrator

use crate::{ClaimOutcome, ClaimwiseConfig, DecisionContext, EngineError, Explainer};
use claimwise_domain::traits::{
    AnomalyDetector, ClaimHistoryStore, EmbeddingProvider, LlmProvider, PatternCatalog, RuleStore,
};
use claimwise_domain::{ClaimSubmission, Decision, DecisionStatus, RawClaim};
use claimwise_eligibility::EligibilityEvaluator;
use claimwise_scorer::FraudScorer;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Decides claims: fraud analysis and eligibility in parallel, then an
/// explanation
///
/// Status depends on eligibility alone. The fraud score is reported but never
/// flips a decision.
///
/// # Examples
///
/// ```no_run
/// use claimwise_engine::{ClaimwiseConfig, DecisionEngine};
/// use claimwise_llm::MockProvider;
/// use claimwise_store::{MockEmbeddingModel, SqliteStore};
/// use claimwise_domain::ClaimSubmission;
/// use std::sync::Arc;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClaimwiseConfig::default();
/// let store = Arc::new(SqliteStore::new(":memory:", 384)?);
/// let engine = DecisionEngine::new(
///     store,
///     Arc::new(MockEmbeddingModel::new(384)),
///     Arc::new(MockProvider::new("Welcome back.")),
///     &config,
/// );
///
/// let claim = ClaimSubmission::new("1234", "Acme Corp", "layoff", 5000.0, 12)?;
/// let decision = engine.decide(&claim).await?;
/// println!("{}: {}", decision.status, decision.explanation);
/// # Ok(())
/// # }
/// ```
pub struct DecisionEngine<S> {
    scorer: FraudScorer<S>,
    eligibility: EligibilityEvaluator<S>,
    explainer: Explainer,
}

impl<S> DecisionEngine<S>
where
    S: ClaimHistoryStore + PatternCatalog + RuleStore + Send + Sync + 'static,
{
    /// Wire an engine over one store and two model providers
    pub fn new(
        store: Arc<S>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        config: &ClaimwiseConfig,
    ) -> Self {
        let timeout = config.providers.timeout();
        Self {
            scorer: FraudScorer::new(Arc::clone(&store), embedder, config.scorer.clone())
                .with_provider_timeout(timeout),
            eligibility: EligibilityEvaluator::new(store, config.eligibility.clone()),
            explainer: Explainer::new(llm, timeout),
        }
    }

    /// Replace the anomaly detector used by the fraud scorer
    pub fn with_anomaly_detector(mut self, detector: Arc<dyn AnomalyDetector>) -> Self {
        self.scorer = self.scorer.with_anomaly_detector(detector);
        self
    }

    /// Replace the explainer
    pub fn with_explainer(mut self, explainer: Explainer) -> Self {
        self.explainer = explainer;
        self
    }

    /// Validate raw input, then decide
    ///
    /// Invalid input is rejected before anything touches the store.
    pub async fn decide_raw(&self, raw: &RawClaim) -> Result<Decision, EngineError> {
        let claim = raw.validate()?;
        self.decide(&claim).await
    }

    /// Decide a claim filed now
    pub async fn decide(&self, claim: &ClaimSubmission) -> Result<Decision, EngineError> {
        self.decide_at(claim, unix_now()).await
    }

    /// Decide a claim filed at `filed_at` (Unix seconds)
    pub async fn decide_at(
        &self,
        claim: &ClaimSubmission,
        filed_at: u64,
    ) -> Result<Decision, EngineError> {
        let (decision, _) = self.decide_with_outcome_at(claim, filed_at).await?;
        Ok(decision)
    }

    /// Decide a claim filed now and keep what the feedback loop needs
    pub async fn decide_with_outcome(
        &self,
        claim: &ClaimSubmission,
    ) -> Result<(Decision, ClaimOutcome), EngineError> {
        self.decide_with_outcome_at(claim, unix_now()).await
    }

    /// Decide a claim filed at `filed_at` and keep what the feedback loop needs
    ///
    /// # Errors
    ///
    /// Store failures in either branch and failed blocking tasks. Provider
    /// failures fall back and never surface.
    pub async fn decide_with_outcome_at(
        &self,
        claim: &ClaimSubmission,
        filed_at: u64,
    ) -> Result<(Decision, ClaimOutcome), EngineError> {
        let (analysis, failed_rules) = tokio::join!(
            self.scorer.analyze_at(claim, filed_at),
            self.eligibility.evaluate(claim),
        );
        let analysis = analysis?;
        let failed_rules = failed_rules?;

        let status = DecisionStatus::from_failed_rules(&failed_rules);
        tracing::debug!(
            "Applicant {}: {} failed rules, fraud score {}",
            claim.ssn_last4(),
            failed_rules.len(),
            analysis.score
        );

        let messages = failed_rules.iter().map(|r| r.message.clone()).collect();
        let context = DecisionContext::new(claim, status, &analysis, messages);
        let explanation = self.explainer.explain(&context).await;

        tracing::info!(
            "Decided claim for applicant {}: {} (fraud score {})",
            claim.ssn_last4(),
            status,
            analysis.score
        );

        let outcome = ClaimOutcome {
            applicant: claim.ssn_last4().clone(),
            employer: claim.employer().to_string(),
            separation_reason: claim.separation_reason().to_string(),
            status,
            fraud_score: analysis.score,
            embedding: analysis.embedding.clone(),
        };
        let decision = Decision {
            status,
            fraud_score: analysis.score,
            failed_rules,
            fraud_indicators: analysis.indicators(),
            explanation,
        };

        Ok((decision, outcome))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
