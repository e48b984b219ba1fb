//! Seed command implementation.

use crate::app::App;
use crate::cli::SeedArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use claimwise_domain::traits::{EmbeddingProvider, PatternCatalog, RuleStore};
use claimwise_domain::{NewFraudPattern, RuleDefinition, Severity};
use claimwise_eligibility::expr::parse_expression;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Execute the seed command.
pub async fn execute_seed(args: SeedArgs, app: &App, formatter: &Formatter) -> Result<()> {
    if args.patterns.is_none() && args.rules.is_none() {
        return Err(CliError::InvalidInput(
            "Must specify --patterns and/or --rules".to_string(),
        ));
    }

    if let Some(path) = &args.rules {
        let rules = read_rules(path)?;
        let count = rules.len();
        app.with_store(move |store| rules.iter().try_for_each(|rule| store.add_rule(rule)))
            .await?;
        println!("{}", formatter.success(&format!("Seeded {} rule(s)", count)));
    }

    if let Some(path) = &args.patterns {
        let seeds = read_patterns(path)?;
        let embedder = app.embedder();
        let mut count = 0;
        for seed in seeds {
            let pattern = seed.into_pattern(Arc::clone(&embedder)).await?;
            let description = pattern.description.clone();
            let id = app.with_store(move |store| store.add_pattern(&pattern)).await?;
            tracing::info!("Added fraud pattern {}: {}", id.0, description);
            count += 1;
        }
        println!("{}", formatter.success(&format!("Seeded {} pattern(s)", count)));
    }

    Ok(())
}

/// Pattern entry of a seed file.
#[derive(Debug, Deserialize)]
struct PatternSeed {
    description: String,
    severity: i64,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

impl PatternSeed {
    /// Build the pattern, embedding the description when no vector is given.
    async fn into_pattern(self, embedder: Arc<dyn EmbeddingProvider>) -> Result<NewFraudPattern> {
        let severity = Severity::new(self.severity)?;
        let embedding = match self.embedding {
            Some(embedding) => embedding,
            None => {
                let text = self.description.clone();
                tokio::task::spawn_blocking(move || embedder.embed(&text))
                    .await
                    .map_err(|e| CliError::Task(e.to_string()))??
            }
        };
        Ok(NewFraudPattern::new(self.description, embedding, severity))
    }
}

fn read_patterns(path: &Path) -> Result<Vec<PatternSeed>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Read a rules file, rejecting expressions that do not parse.
fn read_rules(path: &Path) -> Result<Vec<RuleDefinition>> {
    let text = fs::read_to_string(path)?;
    let rules: Vec<RuleDefinition> = serde_json::from_str(&text)?;

    for rule in &rules {
        parse_expression(&rule.expression).map_err(|e| {
            CliError::InvalidInput(format!("Rule '{}' does not parse: {}", rule.name, e))
        })?;
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimwise_store::MockEmbeddingModel;

    #[test]
    fn test_invalid_rule_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(
            &path,
            r#"[{"name": "broken", "expression": "earnings >", "message": "never"}]"#,
        )
        .unwrap();

        assert!(matches!(read_rules(&path), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_valid_rules_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(
            &path,
            r#"[{"name": "no_gig", "expression": "'gig' not in lower(employer)", "message": "Gig work is not covered"}]"#,
        )
        .unwrap();

        let rules = read_rules(&path).unwrap();
        assert_eq!(rules[0].name, "no_gig");
    }

    #[tokio::test]
    async fn test_missing_embedding_is_computed() {
        let seed = PatternSeed {
            description: "Shell employer with no payroll".to_string(),
            severity: 4,
            embedding: None,
        };
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingModel::new(8));

        let pattern = seed.into_pattern(Arc::clone(&embedder)).await.unwrap();
        assert_eq!(pattern.embedding, embedder.embed("Shell employer with no payroll").unwrap());
        assert_eq!(pattern.severity.value(), 4);
    }

    #[tokio::test]
    async fn test_bad_severity_is_rejected() {
        let seed = PatternSeed {
            description: "Too severe".to_string(),
            severity: 9,
            embedding: Some(vec![0.5; 8]),
        };
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingModel::new(8));

        assert!(matches!(
            seed.into_pattern(embedder).await,
            Err(CliError::Validation(_))
        ));
    }
}
