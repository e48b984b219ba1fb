//! Catalog listing commands.

use crate::app::App;
use crate::error::Result;
use crate::output::Formatter;
use claimwise_domain::traits::{PatternCatalog, RuleStore};

/// Execute the patterns command.
pub async fn execute_patterns(app: &App, formatter: &Formatter) -> Result<()> {
    let patterns = app.with_store(|store| store.list_patterns()).await?;
    println!("{}", formatter.format_patterns(&patterns)?);
    Ok(())
}

/// Execute the rules command.
pub async fn execute_rules(app: &App, formatter: &Formatter) -> Result<()> {
    let rules = app.with_store(|store| store.list_rules()).await?;
    println!("{}", formatter.format_rules(&rules)?);
    Ok(())
}
