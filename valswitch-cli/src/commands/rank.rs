//! Rank command - refresh competitive ranks from HenrikDev.

use anyhow::Result;
use clap::{Args, Subcommand};
use valswitch_store::SyncOutcome;

use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the rank command.
#[derive(Args)]
pub struct RankArgs {
    #[command(subcommand)]
    pub action: RankAction,
}

/// Rank subcommands.
#[derive(Subcommand)]
pub enum RankAction {
    /// Refresh stale ranks for every account, or for one.
    Sync {
        /// Only this account (`Name#Tag`).
        riot_id: Option<String>,
    },
}

/// Runs the rank command.
pub async fn run(args: &RankArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load().await?;
    match &args.action {
        RankAction::Sync { riot_id: Some(id) } => sync_one(&ctx, id, cli).await,
        RankAction::Sync { riot_id: None } => sync_all(&ctx, cli).await,
    }
}

async fn sync_one(ctx: &AppContext, riot_id: &str, cli: &Cli) -> Result<()> {
    let mut account = ctx.find_account(riot_id).await?;
    let outcome = ctx.rank_sync().await?.update_one(&mut account).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            if outcome == SyncOutcome::Skipped {
                println!("Rank is recent, not refetched.");
            }
            println!("{}", formatter.format_account_line(&account));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_accounts(std::slice::from_ref(&account))?);
        }
    }
    Ok(())
}

async fn sync_all(ctx: &AppContext, cli: &Cli) -> Result<()> {
    let mut accounts = ctx.accounts.load().await;
    let summary = ctx.rank_sync().await?.update_all(&mut accounts).await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_accounts(&accounts));
            println!();
            println!("{}", formatter.format_summary(&summary));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_summary(&summary, &accounts)?);
        }
    }
    Ok(())
}
