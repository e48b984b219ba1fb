//! Claimwise CLI - Command-line interface for the claim decisioning engine.

use claimwise_cli::commands;
use claimwise_cli::{config, App, Cli, Command, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("claimwise=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> claimwise_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.store.path = db;
    }

    let formatter = Formatter::new(cli.format.into(), !cli.no_color);
    let app = App::open(config)?;

    match cli.command {
        Command::Decide(args) => commands::execute_decide(args, &app, &formatter).await?,
        Command::History(args) => commands::execute_history(args, &app, &formatter).await?,
        Command::Seed(args) => commands::execute_seed(args, &app, &formatter).await?,
        Command::Patterns => commands::execute_patterns(&app, &formatter).await?,
        Command::Rules => commands::execute_rules(&app, &formatter).await?,
    }

    Ok(())
}
