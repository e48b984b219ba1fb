//! Eligibility configuration

use crate::EligibilityError;
use serde::{Deserialize, Serialize};

/// Thresholds of the built-in eligibility rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    /// Minimum earnings over the last six months (inclusive)
    pub min_earnings: f64,

    /// Minimum employment duration in months (inclusive)
    pub min_employment_months: u32,

    /// Separation reasons that disqualify, compared trimmed and lowercased
    pub disqualifying_reasons: Vec<String>,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            min_earnings: 1_000.0,
            min_employment_months: 3,
            disqualifying_reasons: vec!["quit".to_string(), "resigned".to_string()],
        }
    }
}

impl EligibilityConfig {
    /// Higher thresholds
    pub fn strict() -> Self {
        Self {
            min_earnings: 2_000.0,
            min_employment_months: 6,
            ..Self::default()
        }
    }

    /// Lower thresholds
    pub fn lenient() -> Self {
        Self {
            min_earnings: 500.0,
            min_employment_months: 1,
            ..Self::default()
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), EligibilityError> {
        if !self.min_earnings.is_finite() || self.min_earnings < 0.0 {
            return Err(EligibilityError::Config(format!(
                "min_earnings must be a non-negative number, got {}",
                self.min_earnings
            )));
        }
        Ok(())
    }
}
