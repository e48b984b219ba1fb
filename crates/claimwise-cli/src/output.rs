//! Output formatting for the CLI.

use crate::error::Result;
use claimwise_domain::{
    ApplicantId, ClaimHistoryRecord, Decision, DecisionStatus, FraudIndicators, FraudPattern,
    RuleDefinition,
};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format decisions, each paired with its applicant.
    pub fn format_decisions(&self, decisions: &[(ApplicantId, Decision)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values = decisions
                    .iter()
                    .map(|(applicant, decision)| -> Result<serde_json::Value> {
                        let mut value = serde_json::to_value(decision)?;
                        if let Some(object) = value.as_object_mut() {
                            object.insert(
                                "ssn_last4".to_string(),
                                serde_json::Value::String(applicant.to_string()),
                            );
                        }
                        Ok(value)
                    })
                    .collect::<Result<Vec<_>>>()?;

                if let [single] = values.as_slice() {
                    Ok(serde_json::to_string_pretty(single)?)
                } else {
                    Ok(serde_json::to_string_pretty(&values)?)
                }
            }
            OutputFormat::Table => Ok(self.format_decisions_table(decisions)),
        }
    }

    fn format_decisions_table(&self, decisions: &[(ApplicantId, Decision)]) -> String {
        if decisions.is_empty() {
            return self.colorize("No claims decided.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Applicant", "Status", "Fraud Score", "Failed Rules", "Indicators"]);

        for (applicant, decision) in decisions {
            let failed = decision.failed_rule_messages().join("\n");
            builder.push_record([
                applicant.to_string(),
                decision.status.to_string(),
                format!("{:.2}", decision.fraud_score),
                if failed.is_empty() { "-".to_string() } else { failed },
                summarize_indicators(&decision.fraud_indicators),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = table.to_string();
        for (applicant, decision) in decisions {
            out.push('\n');
            out.push_str(&self.decision_line(applicant, decision));
        }
        out
    }

    /// One colored line per decision with its explanation.
    fn decision_line(&self, applicant: &ApplicantId, decision: &Decision) -> String {
        format!(
            "{} {}: {}",
            self.status(decision.status),
            applicant,
            decision.explanation
        )
    }

    /// Format an applicant's filing history.
    pub fn format_history(
        &self,
        applicant: &ApplicantId,
        records: &[ClaimHistoryRecord],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = records
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "id": r.id.to_string(),
                            "ssn_last4": r.ssn_last4.as_str(),
                            "employer": r.employer,
                            "filed_at": r.filed_at,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Table => {
                if records.is_empty() {
                    return Ok(self.colorize(
                        &format!("No filings found for applicant {}.", applicant),
                        "yellow",
                    ));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Employer", "Filed At"]);
                for record in records {
                    let id = record.id.to_string();
                    builder.push_record([
                        id[..8.min(id.len())].to_string(),
                        record.employer.clone(),
                        record.filed_at.to_string(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format the fraud pattern catalog.
    pub fn format_patterns(&self, patterns: &[FraudPattern]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = patterns
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "id": p.id.0,
                            "description": p.description,
                            "severity": p.severity.value(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Table => {
                if patterns.is_empty() {
                    return Ok(self.colorize("No patterns found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Description", "Severity"]);
                for pattern in patterns {
                    builder.push_record([
                        pattern.id.0.to_string(),
                        pattern.description.clone(),
                        pattern.severity.value().to_string(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format the dynamic eligibility rules.
    pub fn format_rules(&self, rules: &[RuleDefinition]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rules)?),
            OutputFormat::Table => {
                if rules.is_empty() {
                    return Ok(self.colorize("No rules found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Name", "Expression", "Message"]);
                for rule in rules {
                    builder.push_record([
                        rule.name.as_str(),
                        rule.expression.as_str(),
                        rule.message.as_str(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a decision status.
    pub fn status(&self, status: DecisionStatus) -> String {
        match status {
            DecisionStatus::Approved => self.colorize("APPROVED", "green"),
            DecisionStatus::Denied => self.colorize("DENIED", "red"),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Compact one-cell summary of the fraud indicators.
fn summarize_indicators(indicators: &FraudIndicators) -> String {
    let mut lines: Vec<String> = indicators.hard_rule_violations.clone();
    lines.extend(
        indicators
            .matched_patterns
            .iter()
            .map(|p| format!("pattern: {}", p)),
    );
    if indicators.temporal_red_flag {
        lines.push("frequent filings".to_string());
    }
    if indicators.is_anomaly {
        lines.push("anomaly".to_string());
    }

    if lines.is_empty() {
        "-".to_string()
    } else {
        lines.join("\n")
    }
}
