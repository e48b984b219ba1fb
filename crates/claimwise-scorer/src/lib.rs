//! Claimwise Fraud Scorer
//!
//! Scores claim submissions for fraud risk.
//!
//! The scorer combines four signals:
//! - Hard rules (earnings ceiling, minimum employment, employer blacklist)
//! - Temporal red flag (too many filings in the trailing window)
//! - Similarity to curated fraud patterns
//! - Statistical anomaly detection (pluggable, off by default)
//!
//! and fuses them into one score in [0, 1]. The score is advisory; it never
//! decides a claim on its own.
//!
//! # Examples
//!
//! ```no_run
//! use claimwise_scorer::{FraudScorer, ScorerConfig, ZScoreAnomalyDetector};
//! use claimwise_store::{MockEmbeddingModel, SqliteStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(SqliteStore::new("claimwise.db", 384).unwrap());
//! let scorer = FraudScorer::new(store, Arc::new(MockEmbeddingModel::new(384)), ScorerConfig::strict());
//! // let analysis = scorer.analyze(&claim).await?;
//! ```

#![warn(missing_docs)]

pub mod anomaly;
mod config;
mod error;
pub mod fusion;
pub mod hard_rules;
mod scorer;

pub use anomaly::{NoAnomalyDetector, ZScoreAnomalyDetector};
pub use config::ScorerConfig;
pub use error::ScorerError;
pub use fusion::fuse_score;
pub use hard_rules::{HardRule, HardRuleSet};
pub use scorer::{FraudAnalysis, FraudScorer, DEFAULT_PROVIDER_TIMEOUT};
