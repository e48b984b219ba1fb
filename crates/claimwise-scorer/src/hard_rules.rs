//! Fixed fraud checks evaluated before any model call

use crate::ScorerConfig;
use claimwise_domain::ClaimSubmission;

/// One code-defined fraud check
#[derive(Debug, Clone, PartialEq)]
pub enum HardRule {
    /// Earnings strictly above the ceiling
    EarningsTooHigh {
        /// Ceiling in currency units
        ceiling: f64,
    },

    /// Employment strictly shorter than the minimum
    EmploymentTooShort {
        /// Minimum months
        min_months: u32,
    },

    /// Employer is on the blacklist (exact, case-sensitive)
    BlacklistedEmployer {
        /// Blacklisted names
        employers: Vec<String>,
    },
}

impl HardRule {
    /// Name reported in fraud indicators
    pub fn name(&self) -> &'static str {
        match self {
            HardRule::EarningsTooHigh { .. } => "earnings_too_high",
            HardRule::EmploymentTooShort { .. } => "employment_too_short",
            HardRule::BlacklistedEmployer { .. } => "blacklisted_employers",
        }
    }

    /// Whether the claim violates this rule
    pub fn is_violated(&self, claim: &ClaimSubmission) -> bool {
        match self {
            HardRule::EarningsTooHigh { ceiling } => claim.earnings() > *ceiling,
            HardRule::EmploymentTooShort { min_months } => claim.employment_months() < *min_months,
            HardRule::BlacklistedEmployer { employers } => {
                employers.iter().any(|e| e == claim.employer())
            }
        }
    }
}

/// The ordered hard-rule table
#[derive(Debug, Clone, PartialEq)]
pub struct HardRuleSet {
    rules: Vec<HardRule>,
}

impl HardRuleSet {
    /// Build the table in declaration order from the config
    pub fn from_config(config: &ScorerConfig) -> Self {
        Self {
            rules: vec![
                HardRule::EarningsTooHigh {
                    ceiling: config.earnings_ceiling,
                },
                HardRule::EmploymentTooShort {
                    min_months: config.min_employment_months,
                },
                HardRule::BlacklistedEmployer {
                    employers: config.employer_blacklist.clone(),
                },
            ],
        }
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[HardRule] {
        &self.rules
    }

    /// Names of violated rules, in declaration order
    pub fn violations(&self, claim: &ClaimSubmission) -> Vec<String> {
        self.rules
            .iter()
            .filter(|rule| rule.is_violated(claim))
            .map(|rule| rule.name().to_string())
            .collect()
    }
}
