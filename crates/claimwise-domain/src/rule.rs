//! Eligibility rule definitions and results

use serde::{Deserialize, Serialize};

/// A dynamic eligibility rule as held by the rule store
///
/// `expression` is a boolean expression over claim field names; the claim
/// passes the rule when it evaluates to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Rule name (not required to be unique across sources)
    pub name: String,

    /// Boolean expression text
    pub expression: String,

    /// Message shown to the applicant when the rule fails
    pub message: String,
}

impl RuleDefinition {
    /// Create a rule definition
    pub fn new(
        name: impl Into<String>,
        expression: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            message: message.into(),
        }
    }
}

/// A rule the claim did not satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRule {
    /// Rule name
    pub name: String,

    /// User-facing failure message
    pub message: String,
}

impl FailedRule {
    /// Create a failed-rule entry
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}
