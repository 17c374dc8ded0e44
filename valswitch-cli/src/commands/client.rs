//! Client command - check on or stop the Riot Client.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use valswitch_providers::LogNotifier;

use crate::context::AppContext;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the client command.
#[derive(Args)]
pub struct ClientArgs {
    #[command(subcommand)]
    pub action: ClientAction,
}

/// Client subcommands.
#[derive(Subcommand)]
pub enum ClientAction {
    /// Show whether the Riot Client is running.
    Status,

    /// Close the Riot Client, forcing it after a grace period.
    Kill,
}

/// Runs the client command.
pub async fn run(args: &ClientArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load().await?;
    let driver = ctx.login_driver(Arc::new(LogNotifier)).await;

    match args.action {
        ClientAction::Status => {
            let running = driver.is_client_running().await;
            match cli.format {
                OutputFormat::Text => println!(
                    "Riot Client is {}",
                    if running { "running" } else { "not running" }
                ),
                OutputFormat::Json => {
                    let formatter = JsonFormatter::new(cli.pretty);
                    println!("{}", formatter.format(&serde_json::json!({ "running": running }))?);
                }
            }
        }
        ClientAction::Kill => {
            let count = driver.kill_client().await.context("stopping Riot Client")?;
            match cli.format {
                OutputFormat::Text if count == 0 => println!("Riot Client was not running"),
                OutputFormat::Text => println!("Stopped {count} Riot Client process(es)"),
                OutputFormat::Json => {
                    let formatter = JsonFormatter::new(cli.pretty);
                    println!("{}", formatter.format(&serde_json::json!({ "stopped": count }))?);
                }
            }
        }
    }
    Ok(())
}
