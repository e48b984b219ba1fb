//! Code-defined eligibility rules

use crate::EligibilityConfig;
use claimwise_domain::{ClaimSubmission, FailedRule};

/// One built-in rule with its threshold
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinRule {
    /// Earnings at or above the minimum
    MinimumEarnings(f64),

    /// Employment at or above the minimum months
    MinimumEmployment(u32),

    /// Separation reason not in the disqualifying list
    ValidSeparation(Vec<String>),
}

impl BuiltinRule {
    /// All built-ins in evaluation order
    pub fn all(config: &EligibilityConfig) -> Vec<BuiltinRule> {
        vec![
            BuiltinRule::MinimumEarnings(config.min_earnings),
            BuiltinRule::MinimumEmployment(config.min_employment_months),
            BuiltinRule::ValidSeparation(
                config
                    .disqualifying_reasons
                    .iter()
                    .map(|r| r.trim().to_lowercase())
                    .collect(),
            ),
        ]
    }

    /// Rule name
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinRule::MinimumEarnings(_) => "minimum_earnings",
            BuiltinRule::MinimumEmployment(_) => "minimum_employment",
            BuiltinRule::ValidSeparation(_) => "valid_separation",
        }
    }

    /// User-facing failure message
    pub fn message(&self) -> String {
        match self {
            BuiltinRule::MinimumEarnings(min) => format!(
                "Must have earned at least {} in the last 6 months",
                format_dollars(*min)
            ),
            BuiltinRule::MinimumEmployment(months) => {
                format!("Must have been employed for at least {} months", months)
            }
            BuiltinRule::ValidSeparation(_) => "Must not have quit voluntarily".to_string(),
        }
    }

    /// Whether the claim satisfies the rule
    pub fn passes(&self, claim: &ClaimSubmission) -> bool {
        match self {
            BuiltinRule::MinimumEarnings(min) => claim.earnings() >= *min,
            BuiltinRule::MinimumEmployment(months) => claim.employment_months() >= *months,
            BuiltinRule::ValidSeparation(disqualifying) => {
                let reason = claim.separation_reason().trim().to_lowercase();
                !disqualifying.iter().any(|d| *d == reason)
            }
        }
    }

    /// Failed-rule entry for this rule
    pub fn failure(&self) -> FailedRule {
        FailedRule::new(self.name(), self.message())
    }
}

/// `$1,000` / `$1,234.50`
fn format_dollars(amount: f64) -> String {
    let cents = (amount * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match cents % 100 {
        0 => format!("${}", grouped),
        frac => format!("${}.{:02}", grouped, frac),
    }
}
