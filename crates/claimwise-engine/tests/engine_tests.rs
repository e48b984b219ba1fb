//! End-to-end decisioning tests against an in-memory SQLite store

use claimwise_domain::traits::{
    ClaimHistoryStore, EmbeddingProvider, LlmProvider, PatternCatalog, ProviderError, RuleStore,
};
use claimwise_domain::{
    ApplicantId, ClaimSubmission, DecisionStatus, NewFraudPattern, RawClaim, RawNumber,
    RuleDefinition, Severity,
};
use claimwise_engine::{
    ClaimwiseConfig, DecisionEngine, EngineError, Explainer, FeedbackConfig, FeedbackLoop,
    APPROVED_FALLBACK,
};
use claimwise_llm::MockProvider;
use claimwise_store::{MockEmbeddingModel, SqliteStore};
use std::sync::Arc;
use std::time::Duration;

const DIM: usize = 32;
const DAY: u64 = 86_400;
const NOW: u64 = 1_700_000_000;

struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".to_string()))
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

struct SlowLlm;

impl LlmProvider for SlowLlm {
    fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        std::thread::sleep(Duration::from_millis(500));
        Ok("Too late.".to_string())
    }
}

fn config() -> ClaimwiseConfig {
    let mut config = ClaimwiseConfig::default();
    config.store.embedding_dimension = DIM;
    config
}

fn store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::new(":memory:", DIM).unwrap())
}

fn engine_with(store: Arc<SqliteStore>, llm: MockProvider) -> DecisionEngine<SqliteStore> {
    DecisionEngine::new(
        store,
        Arc::new(MockEmbeddingModel::new(DIM)),
        Arc::new(llm),
        &config(),
    )
}

fn engine(store: Arc<SqliteStore>) -> DecisionEngine<SqliteStore> {
    engine_with(store, MockProvider::new("Your claim was reviewed."))
}

fn claim(employer: &str, reason: &str, earnings: f64, months: u32) -> ClaimSubmission {
    ClaimSubmission::new("1234", employer, reason, earnings, months).unwrap()
}

/// Store a severity-5 pattern identical to the claim's own embedding
fn add_matching_pattern(store: &SqliteStore, claim: &ClaimSubmission) {
    let embedding = MockEmbeddingModel::new(DIM)
        .embed(&claim.context_text())
        .unwrap();
    store
        .add_pattern(&NewFraudPattern::new(
            "Known shell employer",
            embedding,
            Severity::new(5).unwrap(),
        ))
        .unwrap();
}

#[tokio::test]
async fn test_clean_claim_is_approved() {
    let engine = engine(store());

    let decision = engine
        .decide_at(&claim("Acme Corp", "layoff", 5000.0, 12), NOW)
        .await
        .unwrap();

    assert_eq!(decision.status, DecisionStatus::Approved);
    assert!(decision.failed_rules.is_empty());
    assert_eq!(decision.fraud_score, 0.0);
    assert_eq!(decision.explanation, "Your claim was reviewed.");
}

#[tokio::test]
async fn test_high_fraud_score_does_not_deny() {
    let store = store();
    let claim = claim("Shell Co", "layoff", 25_000.0, 12);
    add_matching_pattern(&store, &claim);

    let decision = engine(Arc::clone(&store)).decide_at(&claim, NOW).await.unwrap();

    assert_eq!(decision.fraud_score, 1.0);
    assert_eq!(decision.status, DecisionStatus::Approved);
    assert_eq!(
        decision.fraud_indicators.hard_rule_violations,
        vec!["earnings_too_high", "blacklisted_employers"]
    );
    assert_eq!(
        decision.fraud_indicators.matched_patterns,
        vec!["Known shell employer"]
    );
}

#[tokio::test]
async fn test_low_earnings_denied_with_single_rule() {
    let engine = engine_with(store(), MockProvider::failing());

    let decision = engine
        .decide_at(&claim("Acme Corp", "layoff", 999.0, 3), NOW)
        .await
        .unwrap();

    assert_eq!(decision.status, DecisionStatus::Denied);
    assert_eq!(decision.failed_rules.len(), 1);
    assert_eq!(decision.failed_rules[0].name, "minimum_earnings");
    assert_eq!(
        decision.explanation,
        "Your claim has been denied due to the following reasons: \
         Must have earned at least $1,000 in the last 6 months"
    );
}

#[tokio::test]
async fn test_quit_denied_with_single_rule() {
    let decision = engine(store())
        .decide_at(&claim("Acme Corp", "quit", 1000.0, 3), NOW)
        .await
        .unwrap();

    assert_eq!(decision.status, DecisionStatus::Denied);
    let names: Vec<_> = decision.failed_rules.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["valid_separation"]);
}

#[tokio::test]
async fn test_dynamic_rule_applies_to_next_claim() {
    let store = store();
    let engine = engine(Arc::clone(&store));
    let acme = claim("Acme Corp", "layoff", 5000.0, 12);

    let before = engine.decide_at(&acme, NOW).await.unwrap();
    assert_eq!(before.status, DecisionStatus::Approved);

    store
        .add_rule(&RuleDefinition::new(
            "no_acme",
            "lower(employer) != 'acme corp'",
            "Acme Corp claims need manual review",
        ))
        .unwrap();
    store
        .add_rule(&RuleDefinition::new("broken", "earnings >", "never shown"))
        .unwrap();

    let after = engine.decide_at(&acme, NOW + 1).await.unwrap();
    assert_eq!(after.status, DecisionStatus::Denied);
    assert_eq!(after.failed_rule_messages(), vec!["Acme Corp claims need manual review"]);
}

#[tokio::test]
async fn test_fourth_filing_raises_temporal_flag() {
    let engine = engine(store());
    let claim = claim("Acme Corp", "layoff", 5000.0, 12);

    for day in 0..3 {
        let decision = engine.decide_at(&claim, NOW + day * DAY).await.unwrap();
        assert!(!decision.fraud_indicators.temporal_red_flag);
    }

    let fourth = engine.decide_at(&claim, NOW + 3 * DAY).await.unwrap();
    assert!(fourth.fraud_indicators.temporal_red_flag);
    assert_eq!(fourth.fraud_score, 0.3);
    assert_eq!(fourth.status, DecisionStatus::Approved);
}

#[tokio::test]
async fn test_explainer_timeout_uses_fallback() {
    let engine = engine(store())
        .with_explainer(Explainer::new(Arc::new(SlowLlm), Duration::from_millis(50)));

    let decision = engine
        .decide_at(&claim("Acme Corp", "layoff", 5000.0, 12), NOW)
        .await
        .unwrap();

    assert_eq!(decision.status, DecisionStatus::Approved);
    assert_eq!(decision.explanation, APPROVED_FALLBACK);
}

#[tokio::test]
async fn test_invalid_raw_claim_writes_nothing() {
    let store = store();
    let engine = engine(Arc::clone(&store));

    let raw = RawClaim {
        ssn_last4: Some("1234".to_string()),
        employer: Some("Acme Corp".to_string()),
        separation_reason: Some("layoff".to_string()),
        earnings: Some(RawNumber::from("lots")),
        employment_months: Some(RawNumber::from(12.0)),
    };

    let result = engine.decide_raw(&raw).await;
    assert!(matches!(result, Err(EngineError::Validation(_))));

    let applicant = ApplicantId::parse("1234").unwrap();
    assert!(store.history_for(&applicant).unwrap().is_empty());
}

#[tokio::test]
async fn test_valid_raw_claim_is_decided() {
    let raw: RawClaim = serde_json::from_str(
        r#"{"ssn_last4": "4321", "employer": "Acme Corp", "separation_reason": "layoff",
            "earnings": "5000", "employment_months": 12}"#,
    )
    .unwrap();

    let decision = engine(store()).decide_raw(&raw).await.unwrap();
    assert_eq!(decision.status, DecisionStatus::Approved);
}

#[tokio::test]
async fn test_identical_claims_decide_identically() {
    let claim = claim("Shell Co", "quit", 25_000.0, 12);

    let first = engine(store()).decide_at(&claim, NOW).await.unwrap();
    let second = engine(store()).decide_at(&claim, NOW).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_decision_serializes_lowercase_status() {
    let decision = engine(store())
        .decide_at(&claim("Acme Corp", "quit", 5000.0, 12), NOW)
        .await
        .unwrap();

    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["status"], "denied");
    assert_eq!(json["failed_rules"][0]["name"], "valid_separation");
}

#[tokio::test]
async fn test_feedback_records_high_risk_denials() {
    let store = store();
    let engine = engine(Arc::clone(&store));
    let risky = claim("Shell Co", "quit", 25_000.0, 12);
    add_matching_pattern(&store, &risky);

    let (denied, denied_outcome) = engine.decide_with_outcome_at(&risky, NOW).await.unwrap();
    assert_eq!(denied.status, DecisionStatus::Denied);
    assert_eq!(denied.fraud_score, 1.0);

    let (_, approved_outcome) = engine
        .decide_with_outcome_at(&claim("Acme Corp", "layoff", 5000.0, 12), NOW)
        .await
        .unwrap();

    let feedback = FeedbackLoop::new(Arc::clone(&store), &FeedbackConfig::default(), DIM);
    let added = feedback
        .record_outcomes(&[denied_outcome, approved_outcome])
        .await
        .unwrap();
    assert_eq!(added, 1);

    let patterns = store.list_patterns().unwrap();
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns[1].description, "System identified: Shell Co - quit...");
    assert_eq!(patterns[1].severity.value(), 5);
}

#[tokio::test]
async fn test_feedback_skips_missing_embedding() {
    let store = store();
    let engine = DecisionEngine::new(
        Arc::clone(&store),
        Arc::new(FailingEmbedder),
        Arc::new(MockProvider::failing()),
        &config(),
    );

    let (decision, mut outcome) = engine
        .decide_with_outcome_at(&claim("Shell Co", "quit", 25_000.0, 12), NOW)
        .await
        .unwrap();
    assert_eq!(decision.status, DecisionStatus::Denied);

    // Hard rules alone reach 0.5; force the score over the threshold
    outcome.fraud_score = 0.95;

    let feedback = FeedbackLoop::new(Arc::clone(&store), &FeedbackConfig::default(), DIM);
    assert_eq!(feedback.record_outcomes(&[outcome]).await.unwrap(), 0);
    assert!(store.list_patterns().unwrap().is_empty());
}
