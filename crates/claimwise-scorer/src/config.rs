//! Scorer configuration

use crate::ScorerError;
use serde::{Deserialize, Serialize};

/// Thresholds and the hard-rule table inputs for fraud scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Earnings strictly above this violate `earnings_too_high`
    pub earnings_ceiling: f64,

    /// Employment strictly below this violates `employment_too_short`
    pub min_employment_months: u32,

    /// Employers that violate `blacklisted_employers` (exact match)
    pub employer_blacklist: Vec<String>,

    /// Trailing window for the filing-frequency check, in days
    pub temporal_window_days: u64,

    /// More filings than this inside the window raise the temporal flag
    pub temporal_threshold: usize,

    /// Pattern matches need cosine similarity strictly above this
    pub similarity_threshold: f32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            earnings_ceiling: 20_000.0,
            min_employment_months: 1,
            employer_blacklist: vec!["Fake Corp LLC".to_string(), "Shell Co".to_string()],
            temporal_window_days: 365,
            temporal_threshold: 3,
            similarity_threshold: 0.8,
        }
    }
}

impl ScorerConfig {
    /// Tighter thresholds: more claims get flagged
    pub fn strict() -> Self {
        Self {
            earnings_ceiling: 15_000.0,
            min_employment_months: 3,
            temporal_threshold: 2,
            similarity_threshold: 0.75,
            ..Self::default()
        }
    }

    /// Looser thresholds: fewer claims get flagged
    pub fn lenient() -> Self {
        Self {
            earnings_ceiling: 30_000.0,
            min_employment_months: 0,
            temporal_threshold: 5,
            similarity_threshold: 0.9,
            ..Self::default()
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ScorerError> {
        if !self.earnings_ceiling.is_finite() || self.earnings_ceiling < 0.0 {
            return Err(ScorerError::Config(format!(
                "earnings_ceiling must be a non-negative number, got {}",
                self.earnings_ceiling
            )));
        }
        if self.temporal_window_days == 0 {
            return Err(ScorerError::Config(
                "temporal_window_days must be greater than 0".to_string(),
            ));
        }
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ScorerError::Config(format!(
                "similarity_threshold must be in [-1, 1], got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }

    /// Length of the temporal window in seconds
    pub fn temporal_window_secs(&self) -> u64 {
        self.temporal_window_days.saturating_mul(24 * 60 * 60)
    }
}
