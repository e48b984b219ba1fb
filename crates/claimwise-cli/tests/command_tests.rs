//! Command flows against an on-disk SQLite database

use claimwise_cli::cli::{DecideArgs, HistoryArgs, SeedArgs};
use claimwise_cli::commands;
use claimwise_cli::output::OutputFormat;
use claimwise_cli::{App, CliError, Formatter};
use claimwise_domain::traits::{ClaimHistoryStore, PatternCatalog, RuleStore};
use claimwise_domain::ApplicantId;
use claimwise_engine::ClaimwiseConfig;
use std::fs;
use std::path::Path;

fn app(dir: &Path) -> App {
    let mut config = ClaimwiseConfig::default();
    config.store.path = dir.join("claimwise.db");
    config.store.embedding_dimension = 16;
    App::open(config).unwrap()
}

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Json, false)
}

fn decide_args() -> DecideArgs {
    DecideArgs {
        ssn_last4: Some("1234".to_string()),
        employer: Some("Shell Co".to_string()),
        reason: Some("quit".to_string()),
        earnings: Some("25000".to_string()),
        months: Some("12".to_string()),
        json: None,
        no_feedback: false,
    }
}

#[tokio::test]
async fn test_seed_then_list() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let patterns = dir.path().join("patterns.json");
    let rules = dir.path().join("rules.json");
    fs::write(
        &patterns,
        r#"[{"description": "Shell employer", "severity": 3}]"#,
    )
    .unwrap();
    fs::write(
        &rules,
        r#"[{"name": "no_gig", "expression": "'gig' not in lower(employer)", "message": "Gig work is not covered"}]"#,
    )
    .unwrap();

    commands::execute_seed(
        SeedArgs {
            patterns: Some(patterns),
            rules: Some(rules),
        },
        &app,
        &formatter(),
    )
    .await
    .unwrap();

    let stored = app.store.list_patterns().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].embedding.len(), 16);
    assert_eq!(app.store.list_rules().unwrap()[0].name, "no_gig");

    commands::execute_patterns(&app, &formatter()).await.unwrap();
    commands::execute_rules(&app, &formatter()).await.unwrap();
}

#[tokio::test]
async fn test_seed_requires_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::execute_seed(
        SeedArgs {
            patterns: None,
            rules: None,
        },
        &app(dir.path()),
        &formatter(),
    )
    .await;

    assert!(matches!(result, Err(CliError::InvalidInput(_))));
}

#[tokio::test]
async fn test_decide_records_history() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    commands::execute_decide(decide_args(), &app, &formatter())
        .await
        .unwrap();
    commands::execute_history(
        HistoryArgs {
            applicant: "1234".to_string(),
        },
        &app,
        &formatter(),
    )
    .await
    .unwrap();

    let applicant = ApplicantId::parse("1234").unwrap();
    let history = app.store.history_for(&applicant).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].employer, "Shell Co");
}

#[tokio::test]
async fn test_invalid_claim_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let result = commands::execute_decide(
        DecideArgs {
            earnings: Some("-5".to_string()),
            ..decide_args()
        },
        &app,
        &formatter(),
    )
    .await;

    assert!(matches!(result, Err(CliError::Validation(_))));
    let applicant = ApplicantId::parse("1234").unwrap();
    assert!(app.store.history_for(&applicant).unwrap().is_empty());
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let app = app(dir.path());
        commands::execute_decide(decide_args(), &app, &formatter())
            .await
            .unwrap();
    }

    let reopened = app(dir.path());
    let applicant = ApplicantId::parse("1234").unwrap();
    assert_eq!(reopened.store.history_for(&applicant).unwrap().len(), 1);
}
