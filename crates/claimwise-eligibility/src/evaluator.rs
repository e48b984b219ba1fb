//! The eligibility evaluator

use crate::builtin::BuiltinRule;
use crate::expr::{evaluate, parse_expression};
use crate::{EligibilityConfig, EligibilityError, RuleError};
use claimwise_domain::traits::RuleStore;
use claimwise_domain::{ClaimSubmission, FailedRule, RuleDefinition};
use std::sync::Arc;

/// Applies built-in and dynamic rules to a claim
///
/// Dynamic rules are re-read from the store on every call, so rules added
/// at runtime apply to the next claim.
pub struct EligibilityEvaluator<R> {
    rules: Arc<R>,
    builtins: Vec<BuiltinRule>,
    config: EligibilityConfig,
}

impl<R> EligibilityEvaluator<R>
where
    R: RuleStore + Send + Sync + 'static,
{
    /// Create an evaluator over a rule store
    pub fn new(rules: Arc<R>, config: EligibilityConfig) -> Self {
        Self {
            rules,
            builtins: BuiltinRule::all(&config),
            config,
        }
    }

    /// Evaluator configuration
    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    /// Failed rules for the claim: built-ins first, then dynamic rules in
    /// store order
    ///
    /// # Errors
    ///
    /// Only rule-store failures. A dynamic rule that does not parse or
    /// evaluate is logged and skipped.
    pub async fn evaluate(&self, claim: &ClaimSubmission) -> Result<Vec<FailedRule>, EligibilityError> {
        let store = Arc::clone(&self.rules);
        let dynamic = tokio::task::spawn_blocking(move || store.list_rules())
            .await
            .map_err(|e| EligibilityError::Task(e.to_string()))?
            .map_err(|e| {
                tracing::error!("Failed to load eligibility rules: {}", e);
                EligibilityError::Store(Box::new(e))
            })?;

        Ok(self.evaluate_with(claim, &dynamic))
    }

    /// Evaluate against an explicit set of dynamic rules
    pub fn evaluate_with(&self, claim: &ClaimSubmission, dynamic: &[RuleDefinition]) -> Vec<FailedRule> {
        let mut failed: Vec<FailedRule> = self
            .builtins
            .iter()
            .filter(|rule| !rule.passes(claim))
            .map(BuiltinRule::failure)
            .collect();

        for rule in dynamic {
            match check_rule(rule, claim) {
                Ok(true) => {}
                Ok(false) => failed.push(FailedRule::new(&rule.name, &rule.message)),
                Err(e) => {
                    tracing::warn!("Skipping rule '{}': {}", rule.name, e);
                }
            }
        }

        tracing::debug!(
            "Eligibility for {}: {} failed rule(s)",
            claim.ssn_last4(),
            failed.len()
        );
        failed
    }
}

/// Whether the claim passes one dynamic rule
pub fn check_rule(rule: &RuleDefinition, claim: &ClaimSubmission) -> Result<bool, RuleError> {
    let expr = parse_expression(&rule.expression)?;
    evaluate(&expr, claim)
}
