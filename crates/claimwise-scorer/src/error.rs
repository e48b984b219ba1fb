//! Scorer error types

use thiserror::Error;

/// Errors that can occur during fraud scoring
#[derive(Error, Debug)]
pub enum ScorerError {
    /// History or pattern store failure
    #[error("Store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A blocking task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anomaly baseline too small to fit
    #[error("Anomaly baseline needs at least 2 claims, got {0}")]
    InsufficientBaseline(usize),
}

impl ScorerError {
    pub(crate) fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        ScorerError::Store(Box::new(e))
    }
}
