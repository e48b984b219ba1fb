//! Trait definitions for external interactions
//!
//! These traits are the seams between decisioning logic and infrastructure.
//! Storage implementations live in `claimwise-store`; model providers live in
//! `claimwise-llm`.

use crate::{
    ApplicantId, ClaimHistoryRecord, ClaimSubmission, FraudPattern, NewFraudPattern, PatternId,
    PatternMatch, RuleDefinition,
};
use thiserror::Error;

/// Shared error type of a storage backend
///
/// Every store trait extends this, so a backend implementing several of them
/// exposes a single `Error`.
pub trait Storage {
    /// Error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;
}

/// Append-only log of filings keyed by applicant
pub trait ClaimHistoryStore: Storage {
    /// Append one record; never updates an existing row
    fn append_history(&self, record: &ClaimHistoryRecord) -> Result<(), Self::Error>;

    /// Count the applicant's filings strictly after `since` (Unix seconds)
    fn count_filed_since(&self, applicant: &ApplicantId, since: u64) -> Result<usize, Self::Error>;

    /// All filings of an applicant, newest first
    fn history_for(&self, applicant: &ApplicantId) -> Result<Vec<ClaimHistoryRecord>, Self::Error>;
}

/// Curated fraud patterns searchable by embedding similarity
pub trait PatternCatalog: Storage {
    /// Add a pattern and return its id
    fn add_pattern(&self, pattern: &NewFraudPattern) -> Result<PatternId, Self::Error>;

    /// All patterns in id order
    fn list_patterns(&self) -> Result<Vec<FraudPattern>, Self::Error>;

    /// Patterns whose cosine similarity to `query` is strictly above `threshold`,
    /// most similar first
    fn similar_patterns(&self, query: &[f32], threshold: f32)
        -> Result<Vec<PatternMatch>, Self::Error>;
}

/// Dynamically defined eligibility rules
pub trait RuleStore: Storage {
    /// Add a rule at the end of the iteration order
    fn add_rule(&self, rule: &RuleDefinition) -> Result<(), Self::Error>;

    /// All rules in insertion order
    fn list_rules(&self) -> Result<Vec<RuleDefinition>, Self::Error>;
}

/// Failure of an external model provider
///
/// Callers in the decisioning path never surface these; each has a local
/// fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Provider could not be reached
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Provider replied with something unusable
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Call exceeded its time budget
    #[error("Provider call timed out")]
    Timeout,
}

/// Maps text to a fixed-length embedding vector
pub trait EmbeddingProvider: Send + Sync {
    /// Embed the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Length of every vector this provider returns
    fn dimension(&self) -> usize;
}

/// Text generation backend used for decision explanations
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for the prompt
    fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Statistical outlier judgment over a claim
pub trait AnomalyDetector: Send + Sync {
    /// Whether the claim is an outlier
    fn is_anomaly(&self, claim: &ClaimSubmission) -> Result<bool, ProviderError>;
}
