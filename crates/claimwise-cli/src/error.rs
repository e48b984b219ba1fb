//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Decision engine error
    #[error(transparent)]
    Engine(#[from] claimwise_engine::EngineError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] claimwise_store::StoreError),

    /// Claim validation error
    #[error("Validation error: {0}")]
    Validation(#[from] claimwise_domain::ValidationError),

    /// Model provider error outside the decisioning path
    #[error("Provider error: {0}")]
    Provider(#[from] claimwise_domain::traits::ProviderError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A blocking task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}
