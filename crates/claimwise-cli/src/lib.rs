//! Claimwise CLI library.
//!
//! This library provides the core functionality for the `claimwise`
//! command-line interface: configuration loading, wiring of the store and
//! model providers, command execution, and output formatting.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use app::App;
pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use output::Formatter;
