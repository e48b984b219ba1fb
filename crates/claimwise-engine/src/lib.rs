//! Claimwise Decision Engine
//!
//! Composes the fraud scorer, the eligibility evaluator and the explanation
//! generator into one `decide` call, and runs the feedback loop that turns
//! high-risk denials into new fraud patterns.
//!
//! ## Flow
//!
//! 1. Fraud analysis and eligibility run concurrently
//! 2. Status is `Approved` iff no eligibility rule failed
//! 3. The explainer turns the outcome into text, falling back to a template
//!    when the language model is unavailable
//!
//! Configuration for the whole pipeline lives in [`ClaimwiseConfig`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
mod context;
mod engine;
mod error;
mod explainer;
mod feedback;

pub use config::{
    AnomalyConfig, ClaimwiseConfig, FeedbackConfig, ProvidersConfig, StoreConfig,
};
pub use context::{DecisionContext, APPROVED_FALLBACK, DENIED_FALLBACK_PREFIX};
pub use engine::DecisionEngine;
pub use error::EngineError;
pub use explainer::Explainer;
pub use feedback::{ClaimOutcome, FeedbackLoop};
