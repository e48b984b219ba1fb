//! Decide command implementation.

use crate::app::App;
use crate::cli::DecideArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use claimwise_domain::{ClaimSubmission, RawClaim, RawNumber};
use serde::Deserialize;
use std::fs;

/// Execute the decide command.
pub async fn execute_decide(args: DecideArgs, app: &App, formatter: &Formatter) -> Result<()> {
    let feedback_enabled = app.config.feedback.enabled && !args.no_feedback;
    let raw_claims = read_claims(args)?;

    // Validate everything before the first store write
    let claims = raw_claims
        .iter()
        .map(RawClaim::validate)
        .collect::<std::result::Result<Vec<ClaimSubmission>, _>>()?;

    let engine = app.engine()?;
    let mut decisions = Vec::with_capacity(claims.len());
    let mut outcomes = Vec::with_capacity(claims.len());
    for claim in &claims {
        let (decision, outcome) = engine.decide_with_outcome(claim).await?;
        decisions.push((claim.ssn_last4().clone(), decision));
        outcomes.push(outcome);
    }

    println!("{}", formatter.format_decisions(&decisions)?);

    if feedback_enabled {
        let added = app.feedback().record_outcomes(&outcomes).await?;
        if added > 0 {
            eprintln!(
                "{}",
                formatter.info(&format!("Recorded {} new fraud pattern(s)", added))
            );
        }
    }

    Ok(())
}

/// A claims file holds either one claim or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClaimsFile {
    Many(Vec<RawClaim>),
    One(RawClaim),
}

fn read_claims(args: DecideArgs) -> Result<Vec<RawClaim>> {
    if let Some(path) = args.json {
        let text = fs::read_to_string(path)?;
        let claims = match serde_json::from_str(&text)? {
            ClaimsFile::Many(claims) => claims,
            ClaimsFile::One(claim) => vec![claim],
        };
        if claims.is_empty() {
            return Err(CliError::InvalidInput("No claims provided".to_string()));
        }
        return Ok(claims);
    }

    let raw = RawClaim {
        ssn_last4: args.ssn_last4,
        employer: args.employer,
        separation_reason: args.reason,
        earnings: args.earnings.map(RawNumber::Text),
        employment_months: args.months.map(RawNumber::Text),
    };
    if raw == RawClaim::default() {
        return Err(CliError::InvalidInput(
            "Must specify the claim fields or --json".to_string(),
        ));
    }
    Ok(vec![raw])
}
