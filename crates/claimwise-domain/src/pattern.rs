//! Fraud patterns - curated reference cases matched by embedding similarity

use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the pattern catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatternId(pub i64);

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity weight of a fraud pattern, always in 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Severity(u8);

impl Severity {
    /// Lowest severity
    pub const MIN: Severity = Severity(1);

    /// Highest severity
    pub const MAX: Severity = Severity(5);

    /// Validate a severity value
    ///
    /// # Examples
    ///
    /// ```
    /// use claimwise_domain::Severity;
    ///
    /// assert_eq!(Severity::new(3).unwrap().value(), 3);
    /// assert!(Severity::new(0).is_err());
    /// assert!(Severity::new(6).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::InvalidSeverity(value))
        }
    }

    /// Raw severity value
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Severity {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Severity> for i64 {
    fn from(s: Severity) -> Self {
        s.0 as i64
    }
}

/// A stored fraud pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudPattern {
    /// Catalog id
    pub id: PatternId,

    /// Human-readable description
    pub description: String,

    /// Reference embedding (same dimension as the embedding provider)
    pub embedding: Vec<f32>,

    /// Severity weight
    pub severity: Severity,
}

/// A pattern about to be added to the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct NewFraudPattern {
    /// Human-readable description
    pub description: String,

    /// Reference embedding
    pub embedding: Vec<f32>,

    /// Severity weight
    pub severity: Severity,
}

impl NewFraudPattern {
    /// Create a new pattern definition
    pub fn new(description: impl Into<String>, embedding: Vec<f32>, severity: Severity) -> Self {
        Self {
            description: description.into(),
            embedding,
            severity,
        }
    }
}

/// A catalog pattern together with its similarity to a query embedding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMatch {
    /// The matched pattern
    pub pattern: FraudPattern,

    /// Cosine similarity to the query, in [-1, 1]
    pub similarity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_bounds() {
        for v in 1..=5 {
            assert!(Severity::new(v).is_ok());
        }
        assert_eq!(Severity::new(0), Err(ValidationError::InvalidSeverity(0)));
        assert_eq!(Severity::new(-2), Err(ValidationError::InvalidSeverity(-2)));
        assert_eq!(Severity::MIN.value(), 1);
        assert_eq!(Severity::MAX.value(), 5);
    }

    #[test]
    fn test_severity_deserialize_rejects_out_of_range() {
        let ok: Result<Severity, _> = serde_json::from_str("4");
        assert_eq!(ok.unwrap().value(), 4);

        let bad: Result<Severity, _> = serde_json::from_str("9");
        assert!(bad.is_err());
    }
}
