//! What the explanation generator gets to see

use claimwise_domain::{ClaimSubmission, DecisionStatus, FraudIndicators};
use claimwise_scorer::FraudAnalysis;
use serde::Serialize;

/// Approved fallback text
pub const APPROVED_FALLBACK: &str = "Your claim has been approved based on your employment history and earnings. You meet all eligibility requirements.";

/// Prefix of the denied fallback text
pub const DENIED_FALLBACK_PREFIX: &str = "Your claim has been denied due to the following reasons: ";

/// Decision facts handed to the explanation generator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionContext {
    /// Final status
    pub status: DecisionStatus,

    /// Fraud score
    pub fraud_score: f64,

    /// Fraud indicator detail
    pub fraud_indicators: FraudIndicators,

    /// Failed-rule messages, in order
    pub failed_rules: Vec<String>,

    /// Employer named on the claim
    pub employer: String,

    /// Separation reason
    pub separation_reason: String,

    /// Earnings over the last six months
    pub earnings: f64,

    /// Employment duration in months
    pub employment_months: u32,
}

impl DecisionContext {
    /// Assemble the context for one decision
    pub fn new(
        claim: &ClaimSubmission,
        status: DecisionStatus,
        analysis: &FraudAnalysis,
        failed_rules: Vec<String>,
    ) -> Self {
        Self {
            status,
            fraud_score: analysis.score,
            fraud_indicators: analysis.indicators(),
            failed_rules,
            employer: claim.employer().to_string(),
            separation_reason: claim.separation_reason().to_string(),
            earnings: claim.earnings(),
            employment_months: claim.employment_months(),
        }
    }

    /// Prompt for the language model
    pub fn prompt(&self) -> String {
        let failed = if self.failed_rules.is_empty() {
            "None".to_string()
        } else {
            self.failed_rules.join(", ")
        };
        let risk_factors = if self.fraud_indicators.hard_rule_violations.is_empty() {
            "None".to_string()
        } else {
            self.fraud_indicators.hard_rule_violations.join(", ")
        };

        let mut prompt = String::new();
        prompt.push_str(PROMPT_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(&format!("Claim Status: {}\n\n", self.status));
        prompt.push_str("Employment Details:\n");
        prompt.push_str(&format!("- Months Employed: {}\n", self.employment_months));
        prompt.push_str(&format!("- Total Earnings: ${}\n", self.earnings));
        prompt.push_str(&format!("- Employer: {}\n", self.employer));
        prompt.push_str(&format!("- Reason for Separation: {}\n\n", self.separation_reason));
        prompt.push_str("Eligibility Check:\n");
        prompt.push_str(&format!("- Failed Rules: {}\n\n", failed));
        prompt.push_str("Fraud Analysis:\n");
        prompt.push_str(&format!("- Fraud Score: {}\n", self.fraud_score));
        prompt.push_str(&format!("- Risk Factors: {}\n\n", risk_factors));
        prompt.push_str(PROMPT_OUTPUT_REMINDER);
        prompt
    }

    /// Deterministic explanation used whenever the generator cannot answer
    ///
    /// # Examples
    ///
    /// ```
    /// # use claimwise_engine::DecisionContext;
    /// # use claimwise_domain::{DecisionStatus, FraudIndicators};
    /// let context = DecisionContext {
    ///     status: DecisionStatus::Denied,
    ///     fraud_score: 0.0,
    ///     fraud_indicators: FraudIndicators::default(),
    ///     failed_rules: vec!["Must not have quit voluntarily".to_string()],
    ///     employer: "Acme Corp".to_string(),
    ///     separation_reason: "quit".to_string(),
    ///     earnings: 5000.0,
    ///     employment_months: 12,
    /// };
    /// assert_eq!(
    ///     context.fallback_explanation(),
    ///     "Your claim has been denied due to the following reasons: Must not have quit voluntarily"
    /// );
    /// ```
    pub fn fallback_explanation(&self) -> String {
        match self.status {
            DecisionStatus::Approved => APPROVED_FALLBACK.to_string(),
            DecisionStatus::Denied => {
                format!("{}{}", DENIED_FALLBACK_PREFIX, self.failed_rules.join(", "))
            }
        }
    }
}

const PROMPT_INSTRUCTIONS: &str = "You are a friendly unemployment insurance assistant. \
Based on the following information, provide a clear and concise explanation for the claim decision.";

const PROMPT_OUTPUT_REMINDER: &str = "Please provide a clear, friendly explanation (2-3 sentences) for this decision. \
Use simple language. Do not change the decision.";

#[cfg(test)]
mod tests {
    use super::*;

    fn context(status: DecisionStatus, failed: &[&str]) -> DecisionContext {
        DecisionContext {
            status,
            fraud_score: 0.5,
            fraud_indicators: FraudIndicators {
                hard_rule_violations: vec!["earnings_too_high".to_string()],
                ..FraudIndicators::default()
            },
            failed_rules: failed.iter().map(|s| s.to_string()).collect(),
            employer: "Acme Corp".to_string(),
            separation_reason: "layoff".to_string(),
            earnings: 25000.0,
            employment_months: 12,
        }
    }

    #[test]
    fn test_approved_fallback() {
        assert_eq!(
            context(DecisionStatus::Approved, &[]).fallback_explanation(),
            APPROVED_FALLBACK
        );
    }

    #[test]
    fn test_denied_fallback_joins_messages() {
        let explanation = context(DecisionStatus::Denied, &["First reason", "Second reason"])
            .fallback_explanation();
        assert_eq!(
            explanation,
            "Your claim has been denied due to the following reasons: First reason, Second reason"
        );
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = context(DecisionStatus::Denied, &["Must not have quit voluntarily"]).prompt();

        assert!(prompt.contains("Claim Status: denied"));
        assert!(prompt.contains("- Months Employed: 12"));
        assert!(prompt.contains("- Employer: Acme Corp"));
        assert!(prompt.contains("- Failed Rules: Must not have quit voluntarily"));
        assert!(prompt.contains("- Fraud Score: 0.5"));
        assert!(prompt.contains("- Risk Factors: earnings_too_high"));
    }

    #[test]
    fn test_prompt_without_failures() {
        let mut ctx = context(DecisionStatus::Approved, &[]);
        ctx.fraud_indicators = FraudIndicators::default();
        let prompt = ctx.prompt();

        assert!(prompt.contains("- Failed Rules: None"));
        assert!(prompt.contains("- Risk Factors: None"));
    }
}
