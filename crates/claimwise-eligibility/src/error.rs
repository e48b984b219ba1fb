//! Eligibility error types

use thiserror::Error;

/// Failure of a single dynamic rule
///
/// Never fails the evaluation: the rule is logged and skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// Expression text does not parse
    #[error("Parse error: {0}")]
    Parse(String),

    /// Reference to a field outside the whitelist
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Operator applied to the wrong kind of value
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Division by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Expression produced something other than a boolean
    #[error("Rule must evaluate to bool, got {0}")]
    NotBoolean(&'static str),
}

/// Errors that can occur during eligibility evaluation
#[derive(Error, Debug)]
pub enum EligibilityError {
    /// Rule store failure
    #[error("Store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A blocking task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
