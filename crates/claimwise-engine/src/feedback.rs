//! Feedback loop: high-risk denials become fraud patterns

use crate::config::FeedbackConfig;
use crate::EngineError;
use claimwise_domain::traits::PatternCatalog;
use claimwise_domain::{ApplicantId, DecisionStatus, NewFraudPattern, Severity};
use serde::Serialize;
use std::sync::Arc;

/// Characters of the separation reason kept in a pattern description
const REASON_PREVIEW_CHARS: usize = 50;

/// Everything the feedback loop needs to know about a decided claim
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimOutcome {
    /// Applicant the claim belongs to
    pub applicant: ApplicantId,

    /// Employer named on the claim
    pub employer: String,

    /// Separation reason
    pub separation_reason: String,

    /// Final status
    pub status: DecisionStatus,

    /// Fraud score
    pub fraud_score: f64,

    /// Embedding computed during analysis
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

impl ClaimOutcome {
    /// Description of the pattern this outcome would produce
    pub fn pattern_description(&self) -> String {
        let reason: String = self
            .separation_reason
            .chars()
            .take(REASON_PREVIEW_CHARS)
            .collect();
        format!("System identified: {} - {}...", self.employer, reason)
    }

    /// Severity derived from the fraud score, in [1, 5]
    pub fn pattern_severity(&self) -> Severity {
        let raw = (self.fraud_score * 5.0).floor() as i64;
        let clamped = raw.clamp(Severity::MIN.value() as i64, Severity::MAX.value() as i64);
        Severity::new(clamped).unwrap_or(Severity::MIN)
    }
}

/// Appends fraud patterns for denied claims that scored above a threshold
pub struct FeedbackLoop<C> {
    catalog: Arc<C>,
    min_fraud_score: f64,
    dimension: usize,
}

impl<C> FeedbackLoop<C>
where
    C: PatternCatalog + Send + Sync + 'static,
{
    /// Create a loop over a catalog whose embeddings have `dimension` entries
    pub fn new(catalog: Arc<C>, config: &FeedbackConfig, dimension: usize) -> Self {
        Self {
            catalog,
            min_fraud_score: config.min_fraud_score,
            dimension,
        }
    }

    /// Whether an outcome qualifies for a new pattern
    pub fn qualifies(&self, outcome: &ClaimOutcome) -> bool {
        outcome.status == DecisionStatus::Denied && outcome.fraud_score > self.min_fraud_score
    }

    /// Record qualifying outcomes and return how many patterns were added
    ///
    /// Outcomes without a usable embedding (wrong length, or the all-zero
    /// fallback) are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Catalog failures. Patterns added before the failure stay added.
    pub async fn record_outcomes(&self, outcomes: &[ClaimOutcome]) -> Result<usize, EngineError> {
        let mut pending = Vec::new();
        for outcome in outcomes.iter().filter(|o| self.qualifies(o)) {
            if outcome.embedding.len() != self.dimension {
                tracing::warn!(
                    "Skipping feedback for applicant {}: embedding has {} entries, expected {}",
                    outcome.applicant,
                    outcome.embedding.len(),
                    self.dimension
                );
                continue;
            }
            if outcome.embedding.iter().all(|v| *v == 0.0) {
                tracing::warn!(
                    "Skipping feedback for applicant {}: no embedding was computed",
                    outcome.applicant
                );
                continue;
            }

            pending.push(NewFraudPattern::new(
                outcome.pattern_description(),
                outcome.embedding.clone(),
                outcome.pattern_severity(),
            ));
        }

        if pending.is_empty() {
            return Ok(0);
        }

        let catalog = Arc::clone(&self.catalog);
        let added = tokio::task::spawn_blocking(move || {
            let mut added = 0;
            for pattern in &pending {
                let id = catalog.add_pattern(pattern)?;
                tracing::info!(
                    "Added fraud pattern {} from feedback: {} (severity {})",
                    id.0,
                    pattern.description,
                    pattern.severity.value()
                );
                added += 1;
            }
            Ok::<usize, C::Error>(added)
        })
        .await
        .map_err(|e| EngineError::Task(e.to_string()))?
        .map_err(|e| {
            tracing::error!("Failed to record feedback patterns: {}", e);
            EngineError::Store(Box::new(e))
        })?;

        Ok(added)
    }
}
