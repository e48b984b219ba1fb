//! Decision module - the output of one decisioning call

use crate::FailedRule;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    /// No eligibility rule failed
    Approved,

    /// At least one eligibility rule failed
    Denied,
}

impl DecisionStatus {
    /// Derive the status from the failed-rule list
    ///
    /// Fraud signals are advisory and never take part here.
    pub fn from_failed_rules(failed: &[FailedRule]) -> Self {
        if failed.is_empty() {
            DecisionStatus::Approved
        } else {
            DecisionStatus::Denied
        }
    }

    /// Status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Approved => "approved",
            DecisionStatus::Denied => "denied",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraud signals reported alongside the decision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FraudIndicators {
    /// Names of violated hard rules, in declaration order
    pub hard_rule_violations: Vec<String>,

    /// Descriptions of matched fraud patterns
    pub matched_patterns: Vec<String>,

    /// Excessive filing frequency
    pub temporal_red_flag: bool,

    /// Statistical outlier
    pub is_anomaly: bool,
}

/// Approve/deny outcome for one claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Final status
    pub status: DecisionStatus,

    /// Fraud score in [0, 1], two decimals
    pub fraud_score: f64,

    /// Failed eligibility rules, built-ins first
    pub failed_rules: Vec<FailedRule>,

    /// Fraud indicator detail
    pub fraud_indicators: FraudIndicators,

    /// Human-readable explanation
    pub explanation: String,
}

impl Decision {
    /// Messages of the failed rules, in order
    pub fn failed_rule_messages(&self) -> Vec<String> {
        self.failed_rules.iter().map(|r| r.message.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_failed_rules() {
        assert_eq!(DecisionStatus::from_failed_rules(&[]), DecisionStatus::Approved);

        let failed = vec![FailedRule::new("minimum_earnings", "too low")];
        assert_eq!(DecisionStatus::from_failed_rules(&failed), DecisionStatus::Denied);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DecisionStatus::Approved).unwrap(), "\"approved\"");
        assert_eq!(DecisionStatus::Denied.to_string(), "denied");
    }
}
