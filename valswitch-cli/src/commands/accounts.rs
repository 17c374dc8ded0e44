//! Accounts command - list, add, edit and remove stored accounts.

use anyhow::{Context as _, Result, bail};
use clap::{Args, Subcommand};
use tracing::info;
use valswitch_core::{Account, AccountIdentity, AccountValidator, Region};

use crate::context::AppContext;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{AccountMissing, Cli, OutputFormat};

/// Arguments for the accounts command.
#[derive(Args)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub action: AccountsAction,
}

/// Accounts subcommands.
#[derive(Subcommand)]
pub enum AccountsAction {
    /// List stored accounts with their ranks.
    #[command(visible_alias = "ls")]
    List,

    /// Add an account. The password is prompted for without echo.
    Add {
        /// Riot ID as `Name#Tag`.
        riot_id: String,

        /// Riot login name.
        #[arg(long)]
        login: String,

        /// Server region (AP, NA, EU, KR, BR, LATAM).
        #[arg(long, default_value = "NA")]
        region: String,
    },

    /// Edit a stored account. Rank data is kept.
    Edit {
        /// Riot ID of the stored account, as `Name#Tag`.
        riot_id: String,

        /// New Riot ID.
        #[arg(long = "riot-id", value_name = "NAME#TAG")]
        new_riot_id: Option<String>,

        /// New Riot login name.
        #[arg(long)]
        login: Option<String>,

        /// New server region.
        #[arg(long)]
        region: Option<String>,

        /// Prompt for a new password.
        #[arg(long)]
        password: bool,
    },

    /// Remove an account.
    #[command(visible_alias = "rm")]
    Remove {
        /// Riot ID as `Name#Tag`.
        riot_id: String,
    },
}

/// Runs the accounts command.
pub async fn run(args: &AccountsArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load().await?;
    match &args.action {
        AccountsAction::List => list(&ctx, cli).await,
        AccountsAction::Add {
            riot_id,
            login,
            region,
        } => add(&ctx, riot_id, login, region).await,
        AccountsAction::Edit {
            riot_id,
            new_riot_id,
            login,
            region,
            password,
        } => {
            let changes = AccountChanges {
                riot_id: new_riot_id.as_deref(),
                login: login.as_deref(),
                region: region.as_deref(),
                password: *password,
            };
            edit(&ctx, riot_id, &changes).await
        }
        AccountsAction::Remove { riot_id } => remove(&ctx, riot_id).await,
    }
}

async fn list(ctx: &AppContext, cli: &Cli) -> Result<()> {
    let accounts = ctx.accounts.load().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_accounts(&accounts));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_accounts(&accounts)?);
        }
    }
    Ok(())
}

async fn add(ctx: &AppContext, riot_id: &str, login: &str, region: &str) -> Result<()> {
    let identity: AccountIdentity = riot_id.parse()?;
    let password = read_password().await?;

    validate(&identity, login, &password, region)?;
    let region: Region = region.parse()?;

    let token = ctx
        .vault()
        .encrypt(&password)
        .await
        .context("encrypting password")?;

    let account = Account::new(
        identity.game_name.clone(),
        identity.tag_line.clone(),
        login,
        token,
        region.code(),
    );
    if !ctx.accounts.add(account).await {
        bail!("Could not add {identity}: it already exists or the accounts file is not writable");
    }

    info!(account = %identity, "Account added");
    println!("Added {identity} ({})", region.display_name());
    Ok(())
}

/// Fields an edit may change. `None` keeps the stored value.
struct AccountChanges<'a> {
    riot_id: Option<&'a str>,
    login: Option<&'a str>,
    region: Option<&'a str>,
    password: bool,
}

async fn edit(ctx: &AppContext, riot_id: &str, changes: &AccountChanges<'_>) -> Result<()> {
    let stored = ctx.find_account(riot_id).await?;
    let vault = ctx.vault();

    let identity: AccountIdentity = match changes.riot_id {
        Some(id) => id.parse()?,
        None => stored.identity(),
    };
    let login = changes.login.unwrap_or(&stored.account_name);
    let region = changes.region.unwrap_or(&stored.region);
    let password = if changes.password {
        read_password().await?
    } else {
        let current = vault.decrypt(&stored.encrypted_password).await;
        if current.is_empty() {
            bail!("The stored password for {riot_id} cannot be decrypted; pass --password to replace it");
        }
        current
    };

    validate(&identity, login, &password, region)?;
    let region: Region = region.parse()?;

    let mut edited = stored.clone();
    edited.game_name.clone_from(&identity.game_name);
    edited.tag_line.clone_from(&identity.tag_line);
    edited.account_name = login.to_string();
    edited.region = region.code().to_string();
    if changes.password {
        edited.encrypted_password = vault
            .encrypt(&password)
            .await
            .context("encrypting password")?;
    }

    if !ctx.accounts.update(&stored.identity(), &edited).await {
        bail!("Could not update {riot_id}: {identity} is taken or the accounts file is not writable");
    }

    info!(account = %stored.full_username(), target = %identity, "Account edited");
    println!("Updated {identity} ({})", region.display_name());
    Ok(())
}

async fn remove(ctx: &AppContext, riot_id: &str) -> Result<()> {
    let identity: AccountIdentity = riot_id.parse()?;
    if !ctx.accounts.remove(&identity).await {
        return Err(AccountMissing(identity.to_string()).into());
    }
    println!("Removed {identity}");
    Ok(())
}

fn validate(identity: &AccountIdentity, login: &str, password: &str, region: &str) -> Result<()> {
    let report = AccountValidator::validate(
        &identity.game_name,
        &identity.tag_line,
        login,
        password,
        region,
    );
    if !report.is_valid() {
        let problems: Vec<String> = report
            .errors
            .iter()
            .map(|e| format!("  {}: {}", e.field, e.message))
            .collect();
        bail!("Invalid account:\n{}", problems.join("\n"));
    }
    Ok(())
}

/// Prompts on the terminal with echo turned off.
async fn read_password() -> Result<String> {
    tokio::task::spawn_blocking(|| rpassword::prompt_password("Password: "))
        .await
        .context("password prompt task failed")?
        .context("reading password")
}
