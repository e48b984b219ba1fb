//! Configuration for the decision engine
//!
//! Loaded from TOML. Every section and field is optional; missing values
//! take the defaults below.
//!
//! ```toml
//! [store]
//! path = "claimwise.db"
//! embedding_dimension = 384
//!
//! [scorer]
//! earnings_ceiling = 20000.0
//! employer_blacklist = ["Fake Corp LLC", "Shell Co"]
//!
//! [eligibility]
//! min_earnings = 1000.0
//!
//! [providers]
//! mock = false
//! ollama_endpoint = "http://localhost:11434"
//! timeout_secs = 10
//!
//! [feedback]
//! min_fraud_score = 0.8
//! ```

use crate::EngineError;
use claimwise_eligibility::EligibilityConfig;
use claimwise_scorer::ScorerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimwiseConfig {
    /// Storage settings
    pub store: StoreConfig,

    /// Fraud scorer thresholds
    pub scorer: ScorerConfig,

    /// Eligibility thresholds
    pub eligibility: EligibilityConfig,

    /// Model provider settings
    pub providers: ProvidersConfig,

    /// Anomaly detection settings
    pub anomaly: AnomalyConfig,

    /// Feedback loop settings
    pub feedback: FeedbackConfig,
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database path (`:memory:` for a throwaway store)
    pub path: PathBuf,

    /// Length of every embedding vector
    pub embedding_dimension: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("claimwise.db"),
            embedding_dimension: 384,
        }
    }
}

/// Model provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Use the offline mock providers instead of Ollama
    pub mock: bool,

    /// Ollama API endpoint
    pub ollama_endpoint: String,

    /// Model used for embeddings
    pub embedding_model: String,

    /// Model used for explanations
    pub llm_model: String,

    /// Time budget for each provider call (seconds)
    pub timeout_secs: u64,

    /// HTTP attempts per provider request
    pub max_retries: u32,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            mock: true,
            ollama_endpoint: claimwise_llm::ollama::DEFAULT_ENDPOINT.to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            llm_model: "llama3".to_string(),
            timeout_secs: 10,
            max_retries: 1,
        }
    }
}

impl ProvidersConfig {
    /// Provider time budget as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Anomaly detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// JSON file of baseline claims; no detector is used when unset
    pub baseline: Option<PathBuf>,

    /// |z| above which a feature is an outlier
    pub z_threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            baseline: None,
            z_threshold: claimwise_scorer::anomaly::DEFAULT_Z_THRESHOLD,
        }
    }
}

/// Feedback loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Record high-risk denials as new fraud patterns
    pub enabled: bool,

    /// Denials scoring strictly above this become patterns
    pub min_fraud_score: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_fraud_score: 0.8,
        }
    }
}

impl ClaimwiseConfig {
    /// Strict scorer and eligibility thresholds
    pub fn strict() -> Self {
        Self {
            scorer: ScorerConfig::strict(),
            eligibility: EligibilityConfig::strict(),
            ..Self::default()
        }
    }

    /// Lenient scorer and eligibility thresholds
    pub fn lenient() -> Self {
        Self {
            scorer: ScorerConfig::lenient(),
            eligibility: EligibilityConfig::lenient(),
            ..Self::default()
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        let config: ClaimwiseConfig = toml::from_str(text)
            .map_err(|e| EngineError::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.store.embedding_dimension == 0 {
            return Err(EngineError::Config(
                "store.embedding_dimension must be greater than 0".to_string(),
            ));
        }
        if self.providers.timeout_secs == 0 {
            return Err(EngineError::Config(
                "providers.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.feedback.min_fraud_score) {
            return Err(EngineError::Config(format!(
                "feedback.min_fraud_score must be in [0, 1], got {}",
                self.feedback.min_fraud_score
            )));
        }
        if !self.anomaly.z_threshold.is_finite() || self.anomaly.z_threshold <= 0.0 {
            return Err(EngineError::Config(format!(
                "anomaly.z_threshold must be positive, got {}",
                self.anomaly.z_threshold
            )));
        }

        self.scorer.validate()?;
        self.eligibility.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClaimwiseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.store.embedding_dimension, 384);
        assert!(config.providers.mock);
        assert_eq!(config.feedback.min_fraud_score, 0.8);
        assert_eq!(config.anomaly.baseline, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClaimwiseConfig::from_toml_str(
            r#"
            [store]
            embedding_dimension = 768

            [scorer]
            employer_blacklist = ["Initech"]

            [providers]
            mock = false
            "#,
        )
        .unwrap();

        assert_eq!(config.store.embedding_dimension, 768);
        assert_eq!(config.store.path, PathBuf::from("claimwise.db"));
        assert_eq!(config.scorer.employer_blacklist, vec!["Initech"]);
        assert_eq!(config.scorer.earnings_ceiling, 20_000.0);
        assert!(!config.providers.mock);
        assert_eq!(config.eligibility, EligibilityConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ClaimwiseConfig::from_toml_str("[store]\nembedding_dimension = 0"),
            Err(EngineError::Config(_))
        ));
        assert!(ClaimwiseConfig::from_toml_str("[providers]\ntimeout_secs = 0").is_err());
        assert!(ClaimwiseConfig::from_toml_str("[feedback]\nmin_fraud_score = 1.5").is_err());
        assert!(ClaimwiseConfig::from_toml_str("[scorer]\nsimilarity_threshold = 2.0").is_err());
        assert!(ClaimwiseConfig::from_toml_str("[eligibility]\nmin_earnings = -5.0").is_err());
        assert!(ClaimwiseConfig::from_toml_str("store = 3").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ClaimwiseConfig::strict();
        let text = config.to_toml_string().unwrap();
        assert_eq!(ClaimwiseConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_bundled_example_parses() {
        let config = ClaimwiseConfig::from_toml_str(include_str!("../../../demos/config.toml"))
            .unwrap();
        assert_eq!(config, ClaimwiseConfig::default());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[feedback]\nenabled = false\n").unwrap();

        let config = ClaimwiseConfig::from_file(&path).unwrap();
        assert!(!config.feedback.enabled);

        assert!(ClaimwiseConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
