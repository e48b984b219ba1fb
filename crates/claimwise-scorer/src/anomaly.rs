//! Statistical outlier detection over claim features
//!
//! Two detectors ship with the scorer:
//!
//! - `NoAnomalyDetector`: never flags anything (the default)
//! - `ZScoreAnomalyDetector`: flags claims whose earnings, employment months
//!   or employer-name length sit far outside a fitted baseline
//!
//! # Examples
//!
//! ```
//! use claimwise_domain::ClaimSubmission;
//! use claimwise_domain::traits::AnomalyDetector;
//! use claimwise_scorer::ZScoreAnomalyDetector;
//!
//! let baseline: Vec<_> = (0..20)
//!     .map(|i| ClaimSubmission::new("1234", "Acme Corp", "layoff", 4000.0 + i as f64 * 50.0, 12).unwrap())
//!     .collect();
//! let detector = ZScoreAnomalyDetector::fit(&baseline, 3.0).unwrap();
//!
//! let outlier = ClaimSubmission::new("1234", "Acme Corp", "layoff", 90_000.0, 12).unwrap();
//! assert!(detector.is_anomaly(&outlier).unwrap());
//! ```

use crate::ScorerError;
use claimwise_domain::traits::{AnomalyDetector, ProviderError};
use claimwise_domain::ClaimSubmission;

/// Default |z| above which a feature is an outlier
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

const FEATURES: usize = 3;

/// Detector that never flags a claim
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnomalyDetector;

impl AnomalyDetector for NoAnomalyDetector {
    fn is_anomaly(&self, _claim: &ClaimSubmission) -> Result<bool, ProviderError> {
        Ok(false)
    }
}

/// Per-feature z-score detector fitted from a baseline of claims
#[derive(Debug, Clone, PartialEq)]
pub struct ZScoreAnomalyDetector {
    means: [f64; FEATURES],
    std_devs: [f64; FEATURES],
    threshold: f64,
}

impl ZScoreAnomalyDetector {
    /// Fit means and population standard deviations from `baseline`
    ///
    /// # Errors
    ///
    /// Fewer than two claims, or a threshold that is not a positive number.
    pub fn fit(baseline: &[ClaimSubmission], threshold: f64) -> Result<Self, ScorerError> {
        if baseline.len() < 2 {
            return Err(ScorerError::InsufficientBaseline(baseline.len()));
        }
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ScorerError::Config(format!(
                "anomaly threshold must be positive, got {}",
                threshold
            )));
        }

        let n = baseline.len() as f64;
        let rows: Vec<[f64; FEATURES]> = baseline.iter().map(features).collect();

        let mut means = [0.0; FEATURES];
        for row in &rows {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value / n;
            }
        }

        let mut std_devs = [0.0; FEATURES];
        for (i, std_dev) in std_devs.iter_mut().enumerate() {
            let variance = rows.iter().map(|row| (row[i] - means[i]).powi(2)).sum::<f64>() / n;
            *std_dev = variance.sqrt();
        }

        tracing::debug!(
            "Fitted anomaly baseline over {} claims (means {:?}, std devs {:?})",
            baseline.len(),
            means,
            std_devs
        );

        Ok(Self {
            means,
            std_devs,
            threshold,
        })
    }

    /// Absolute z-score of each feature; `None` for zero-variance features
    pub fn z_scores(&self, claim: &ClaimSubmission) -> [Option<f64>; FEATURES] {
        let values = features(claim);
        let mut scores = [None; FEATURES];
        for (i, score) in scores.iter_mut().enumerate() {
            if self.std_devs[i] > 0.0 {
                *score = Some(((values[i] - self.means[i]) / self.std_devs[i]).abs());
            }
        }
        scores
    }
}

impl AnomalyDetector for ZScoreAnomalyDetector {
    fn is_anomaly(&self, claim: &ClaimSubmission) -> Result<bool, ProviderError> {
        Ok(self
            .z_scores(claim)
            .iter()
            .flatten()
            .any(|z| *z > self.threshold))
    }
}

/// Earnings, employment months, employer-name length in characters
fn features(claim: &ClaimSubmission) -> [f64; FEATURES] {
    [
        claim.earnings(),
        f64::from(claim.employment_months()),
        claim.employer().chars().count() as f64,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(employer: &str, earnings: f64, months: u32) -> ClaimSubmission {
        ClaimSubmission::new("1234", employer, "layoff", earnings, months).unwrap()
    }

    fn baseline() -> Vec<ClaimSubmission> {
        (0..10)
            .map(|i| claim("Acme Corp", 4_000.0 + f64::from(i) * 100.0, 10 + i))
            .collect()
    }

    #[test]
    fn test_no_anomaly_detector() {
        let detector = NoAnomalyDetector;
        assert!(!detector.is_anomaly(&claim("Acme Corp", 1e9, 0)).unwrap());
    }

    #[test]
    fn test_fit_requires_two_claims() {
        let result = ZScoreAnomalyDetector::fit(&baseline()[..1], DEFAULT_Z_THRESHOLD);
        assert!(matches!(result, Err(ScorerError::InsufficientBaseline(1))));

        assert!(ZScoreAnomalyDetector::fit(&[], DEFAULT_Z_THRESHOLD).is_err());
    }

    #[test]
    fn test_fit_rejects_bad_threshold() {
        assert!(ZScoreAnomalyDetector::fit(&baseline(), 0.0).is_err());
        assert!(ZScoreAnomalyDetector::fit(&baseline(), f64::NAN).is_err());
    }

    #[test]
    fn test_typical_claim_is_not_anomalous() {
        let detector = ZScoreAnomalyDetector::fit(&baseline(), DEFAULT_Z_THRESHOLD).unwrap();
        assert!(!detector.is_anomaly(&claim("Acme Corp", 4_500.0, 14)).unwrap());
    }

    #[test]
    fn test_extreme_earnings_flagged() {
        let detector = ZScoreAnomalyDetector::fit(&baseline(), DEFAULT_Z_THRESHOLD).unwrap();
        assert!(detector.is_anomaly(&claim("Acme Corp", 50_000.0, 14)).unwrap());
    }

    #[test]
    fn test_zero_variance_feature_ignored() {
        // Every baseline employer name has the same length
        let detector = ZScoreAnomalyDetector::fit(&baseline(), DEFAULT_Z_THRESHOLD).unwrap();
        let scores = detector.z_scores(&claim("A much longer employer name", 4_500.0, 14));
        assert!(scores[2].is_none());
        assert!(!detector
            .is_anomaly(&claim("A much longer employer name", 4_500.0, 14))
            .unwrap());
    }

    #[test]
    fn test_population_std_dev() {
        let pair = vec![claim("Acme", 1_000.0, 10), claim("Acme", 3_000.0, 10)];
        let detector = ZScoreAnomalyDetector::fit(&pair, DEFAULT_Z_THRESHOLD).unwrap();

        // mean 2000, population std dev 1000
        let scores = detector.z_scores(&claim("Acme", 5_000.0, 10));
        assert!((scores[0].unwrap() - 3.0).abs() < 1e-9);
        assert!(!detector.is_anomaly(&claim("Acme", 5_000.0, 10)).unwrap());
        assert!(detector.is_anomaly(&claim("Acme", 5_001.0, 10)).unwrap());
    }
}
