//! Engine error types

use claimwise_domain::ValidationError;
use claimwise_eligibility::EligibilityError;
use claimwise_scorer::ScorerError;
use thiserror::Error;

/// Errors that can occur while deciding a claim
#[derive(Error, Debug)]
pub enum EngineError {
    /// Claim failed input validation; nothing was written
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Store failure in either branch
    #[error("Store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A blocking task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ScorerError> for EngineError {
    fn from(e: ScorerError) -> Self {
        match e {
            ScorerError::Store(inner) => EngineError::Store(inner),
            ScorerError::Task(msg) => EngineError::Task(msg),
            other => EngineError::Config(other.to_string()),
        }
    }
}

impl From<EligibilityError> for EngineError {
    fn from(e: EligibilityError) -> Self {
        match e {
            EligibilityError::Store(inner) => EngineError::Store(inner),
            EligibilityError::Task(msg) => EngineError::Task(msg),
            EligibilityError::Config(msg) => EngineError::Config(msg),
        }
    }
}

impl From<claimwise_store::StoreError> for EngineError {
    fn from(e: claimwise_store::StoreError) -> Self {
        EngineError::Store(Box::new(e))
    }
}
