//! History command implementation.

use crate::app::App;
use crate::cli::HistoryArgs;
use crate::error::Result;
use crate::output::Formatter;
use claimwise_domain::traits::ClaimHistoryStore;
use claimwise_domain::ApplicantId;

/// Execute the history command.
pub async fn execute_history(args: HistoryArgs, app: &App, formatter: &Formatter) -> Result<()> {
    let applicant = ApplicantId::parse(&args.applicant)?;
    let lookup = applicant.clone();
    let records = app
        .with_store(move |store| store.history_for(&lookup))
        .await?;

    println!("{}", formatter.format_history(&applicant, &records)?);

    Ok(())
}
