//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Claimwise CLI - Decide unemployment claims and manage the fraud catalog.
#[derive(Debug, Parser)]
#[command(name = "claimwise")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (defaults to ~/.claimwise/config.toml)
    #[arg(short, long, global = true, env = "CLAIMWISE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database path, overriding the configuration
    #[arg(long, global = true, env = "CLAIMWISE_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decide one claim, or every claim in a JSON file
    Decide(DecideArgs),

    /// List an applicant's filings, newest first
    History(HistoryArgs),

    /// Load fraud patterns and eligibility rules from JSON files
    Seed(SeedArgs),

    /// List the fraud pattern catalog
    Patterns,

    /// List the dynamic eligibility rules
    Rules,
}

/// Arguments for the decide command.
#[derive(Debug, Parser)]
pub struct DecideArgs {
    /// Last four digits of the applicant's national ID
    #[arg(long, conflicts_with = "json")]
    pub ssn_last4: Option<String>,

    /// Employer name
    #[arg(long, conflicts_with = "json")]
    pub employer: Option<String>,

    /// Reason for separation
    #[arg(long, conflicts_with = "json")]
    pub reason: Option<String>,

    /// Earnings over the last six months
    #[arg(long, conflicts_with = "json", allow_hyphen_values = true)]
    pub earnings: Option<String>,

    /// Employment duration in months
    #[arg(long, conflicts_with = "json", allow_hyphen_values = true)]
    pub months: Option<String>,

    /// JSON file holding one claim object or an array of them
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Do not record high-risk denials as fraud patterns
    #[arg(long)]
    pub no_feedback: bool,
}

/// Arguments for the history command.
#[derive(Debug, Parser)]
pub struct HistoryArgs {
    /// Last four digits of the applicant's national ID
    pub applicant: String,
}

/// Arguments for the seed command.
#[derive(Debug, Parser)]
pub struct SeedArgs {
    /// JSON array of patterns: [{"description", "severity", "embedding"?}]
    #[arg(short, long)]
    pub patterns: Option<PathBuf>,

    /// JSON array of rules: [{"name", "expression", "message"}]
    #[arg(short, long)]
    pub rules: Option<PathBuf>,
}

impl From<CliFormat> for crate::output::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::output::OutputFormat::Table,
            CliFormat::Json => crate::output::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_with_flags() {
        let cli = Cli::parse_from([
            "claimwise",
            "decide",
            "--ssn-last4",
            "1234",
            "--employer",
            "Acme Corp",
            "--reason",
            "layoff",
            "--earnings",
            "5000",
            "--months",
            "12",
        ]);
        match cli.command {
            Command::Decide(args) => {
                assert_eq!(args.ssn_last4.as_deref(), Some("1234"));
                assert_eq!(args.earnings.as_deref(), Some("5000"));
                assert!(!args.no_feedback);
            }
            _ => panic!("Expected Decide command"),
        }
        assert_eq!(cli.format, CliFormat::Table);
    }

    #[test]
    fn test_json_conflicts_with_flags() {
        let result = Cli::try_parse_from([
            "claimwise",
            "decide",
            "--json",
            "claims.json",
            "--employer",
            "Acme Corp",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["claimwise", "patterns", "--format", "json", "--no-color"]);
        assert!(matches!(cli.command, Command::Patterns));
        assert_eq!(cli.format, CliFormat::Json);
        assert!(cli.no_color);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["claimwise"]).is_err());
    }
}
