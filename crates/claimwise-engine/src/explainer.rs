//! Explanation generation with a deterministic fallback

use crate::DecisionContext;
use claimwise_domain::traits::LlmProvider;
use std::sync::Arc;
use std::time::Duration;

/// Turns a decision context into user-facing text
///
/// Never fails: provider errors, timeouts and blank replies all produce the
/// templated fallback.
pub struct Explainer {
    llm: Option<Arc<dyn LlmProvider>>,
    timeout: Duration,
}

impl Explainer {
    /// Explainer backed by a language model
    pub fn new(llm: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self {
            llm: Some(llm),
            timeout,
        }
    }

    /// Explainer that always uses the templated text
    pub fn fallback_only() -> Self {
        Self {
            llm: None,
            timeout: Duration::ZERO,
        }
    }

    /// Produce the explanation
    pub async fn explain(&self, context: &DecisionContext) -> String {
        let Some(llm) = &self.llm else {
            return context.fallback_explanation();
        };

        let llm = Arc::clone(llm);
        let prompt = context.prompt();
        let outcome = tokio::time::timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || llm.generate(&prompt)),
        )
        .await;

        let reply = match outcome {
            Ok(Ok(Ok(text))) => text,
            Ok(Ok(Err(e))) => {
                tracing::warn!("Explanation generation failed: {}; using fallback", e);
                return context.fallback_explanation();
            }
            Ok(Err(e)) => {
                tracing::warn!("Explanation task failed: {}; using fallback", e);
                return context.fallback_explanation();
            }
            Err(_) => {
                tracing::warn!("Explanation timed out after {:?}; using fallback", self.timeout);
                return context.fallback_explanation();
            }
        };

        let cleaned = clean_reply(&reply);
        if cleaned.is_empty() {
            tracing::warn!("Explanation generator returned empty text; using fallback");
            return context.fallback_explanation();
        }
        cleaned
    }
}

/// Trim the reply and drop a leading "Explanation:" label
fn clean_reply(reply: &str) -> String {
    let trimmed = reply.trim();
    trimmed
        .strip_prefix("Explanation:")
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}
