//! Login command - fill the Riot Client login form for a stored account.

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;
use valswitch_providers::{LoginJob, LoginWorker};

use crate::Cli;
use crate::context::{AppContext, ConsoleNotifier};

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Riot ID as `Name#Tag`.
    pub riot_id: String,
}

/// Runs the login command.
pub async fn run(args: &LoginArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load().await?;
    let account = ctx.find_account(&args.riot_id).await?;

    let notifier = Arc::new(ConsoleNotifier::default());
    let driver = ctx.login_driver(notifier.clone()).await;

    let worker = LoginWorker::spawn(Arc::new(driver));
    worker.submit(LoginJob::Account(Box::new(account))).await;
    worker.shutdown().await;

    if notifier.failed() {
        bail!("Login for {} did not complete", args.riot_id);
    }
    if !cli.quiet {
        println!("Submitted login for {}", args.riot_id);
    }
    Ok(())
}
