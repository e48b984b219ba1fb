//! Claimwise Domain Layer
//!
//! Core value types and collaborator interfaces for the claim decisioning
//! pipeline. Everything else in the workspace depends on this crate; it
//! holds no I/O and no infrastructure.
//!
//! ## Key Concepts
//!
//! - **ClaimSubmission**: a validated unemployment claim, immutable once built
//! - **ClaimHistoryRecord**: append-only log entry written for every analysis
//! - **FraudPattern**: curated reference embedding with a severity weight
//! - **RuleDefinition**: a dynamic eligibility rule (name, expression, message)
//! - **Decision**: approve/deny outcome with fraud indicators and explanation
//!
//! ## Architecture
//!
//! Infrastructure (SQLite, HTTP providers) lives in other crates and plugs in
//! through the traits in [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod decision;
pub mod history;
pub mod pattern;
pub mod rule;
pub mod traits;

// Re-exports for convenience
pub use claim::{ApplicantId, ClaimSubmission, RawClaim, RawNumber, ValidationError};
pub use decision::{Decision, DecisionStatus, FraudIndicators};
pub use history::{ClaimHistoryRecord, RecordId};
pub use pattern::{FraudPattern, NewFraudPattern, PatternId, PatternMatch, Severity};
pub use rule::{FailedRule, RuleDefinition};
