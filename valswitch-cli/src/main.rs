// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Valswitch CLI - Valorant account switching and rank tracking.
//!
//! # Examples
//!
//! ```bash
//! # List stored accounts with their ranks
//! valswitch accounts list
//!
//! # Add an account (password is read from stdin)
//! valswitch accounts add "Foo#1234" --login foo_login --region EU
//!
//! # Refresh every stale rank
//! valswitch rank sync
//!
//! # Log into the Riot Client as one account
//! valswitch login "Foo#1234"
//!
//! # JSON output
//! valswitch accounts list --format json --pretty
//! ```

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{accounts, client, config, login, rank};

// ============================================================================
// CLI Definition
// ============================================================================

/// Valswitch CLI - Valorant account switcher.
#[derive(Parser)]
#[command(name = "valswitch")]
#[command(about = "Valorant account switcher with auto-login and rank sync")]
#[command(long_about = r#"
Valswitch stores Valorant accounts, logs into the Riot Client for you and
keeps competitive ranks up to date through the HenrikDev API.

Examples:
  valswitch accounts list              # Stored accounts and ranks
  valswitch rank sync                  # Refresh stale ranks
  valswitch login "Foo#1234"           # Fill the Riot Client login form
  valswitch config set-api-key HDEV-…  # Store the HenrikDev key
"#)]
#[command(version)]
#[command(author = "Valswitch Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Manage stored accounts.
    #[command(visible_alias = "a")]
    Accounts(accounts::AccountsArgs),

    /// Fetch competitive ranks.
    #[command(visible_alias = "r")]
    Rank(rank::RankArgs),

    /// Log into the Riot Client as a stored account.
    #[command(visible_alias = "l")]
    Login(login::LoginArgs),

    /// Inspect or stop the Riot Client.
    Client(client::ClientArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Account not found.
    AccountMissing = 2,
}

/// An error that maps to a specific exit code.
#[derive(Debug)]
pub struct AccountMissing(pub String);

impl std::fmt::Display for AccountMissing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No stored account named {}", self.0)
    }
}

impl std::error::Error for AccountMissing {}

// ============================================================================
// Logging Setup
// ============================================================================

fn log_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    if quiet {
        EnvFilter::new("valswitch=error")
    } else if verbose {
        EnvFilter::new("valswitch=debug,info")
    } else {
        EnvFilter::new("valswitch=warn")
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(log_filter(verbose, quiet))
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Accounts(args) => accounts::run(args, &cli).await,
        Commands::Rank(args) => rank::run(args, &cli).await,
        Commands::Login(args) => login::run(args, &cli).await,
        Commands::Client(args) => client::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        let code = if e.downcast_ref::<AccountMissing>().is_some() {
            ExitCode::AccountMissing
        } else {
            ExitCode::Error
        };
        std::process::exit(code as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}
