//! Claimwise Eligibility Evaluator
//!
//! Decides which eligibility rules a claim fails.
//!
//! Rules come from two places:
//! - Built-ins: minimum earnings, minimum employment, valid separation
//! - Dynamic rules from a `RuleStore`, written in a small expression
//!   language (see [`expr`])
//!
//! A dynamic rule that cannot be parsed or evaluated is skipped with a
//! warning instead of failing the claim.
//!
//! # Examples
//!
//! ```no_run
//! use claimwise_eligibility::{EligibilityConfig, EligibilityEvaluator};
//! use claimwise_store::SqliteStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(SqliteStore::new("claimwise.db", 384).unwrap());
//! let evaluator = EligibilityEvaluator::new(store, EligibilityConfig::default());
//! // let failed = evaluator.evaluate(&claim).await?;
//! ```

#![warn(missing_docs)]

mod builtin;
mod config;
mod error;
mod evaluator;
pub mod expr;

pub use builtin::BuiltinRule;
pub use config::EligibilityConfig;
pub use error::{EligibilityError, RuleError};
pub use evaluator::{check_rule, EligibilityEvaluator};
