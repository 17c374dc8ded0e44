//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;
use valswitch_core::Region;
use valswitch_fetch::redact;
use valswitch_store::{default_accounts_path, default_config_dir, legacy_api_key_path};

use crate::context::AppContext;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the region used for accounts without one.
    SetRegion {
        /// AP, NA, EU, KR, BR or LATAM.
        region: String,
    },

    /// Store the HenrikDev API key in the system keychain.
    SetApiKey {
        /// The key, e.g. `HDEV-…`.
        key: String,
    },

    /// Remove the stored HenrikDev API key.
    ClearApiKey,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    let ctx = AppContext::load().await?;
    match &args.action {
        ConfigAction::Show => show_config(&ctx, cli).await,
        ConfigAction::Path => show_paths(&ctx, cli),
        ConfigAction::SetRegion { region } => set_region(&ctx, region).await,
        ConfigAction::SetApiKey { key } => set_api_key(&ctx, key).await,
        ConfigAction::ClearApiKey => clear_api_key(&ctx).await,
    }
}

async fn show_config(ctx: &AppContext, cli: &Cli) -> Result<()> {
    let settings = ctx.current_settings().await;
    let key = ctx.api_keys().resolve().await;

    match cli.format {
        OutputFormat::Text => {
            println!("Valswitch Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!(
                "Default region:    {} ({})",
                settings.default_region,
                settings.default_region.display_name()
            );
            println!("Concurrent fetches: {}", settings.fetch_concurrency());
            println!("Fetch attempts:    {}", settings.max_retries);
            match &key {
                Some((value, origin)) => println!("API key:           {} from {origin}", mask(value)),
                None => println!("API key:           not configured"),
            }
            if !settings.extra_client_paths.is_empty() {
                println!();
                println!("Extra Riot Client paths:");
                for path in &settings.extra_client_paths {
                    println!("  • {}", path.display());
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "settings": settings,
                "api_key_source": key.as_ref().map(|(_, origin)| origin.to_string()),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}

fn show_paths(ctx: &AppContext, cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let accounts_path = default_accounts_path();
    let settings_path = ctx.settings.path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Accounts file: {}", accounts_path.display());
            println!("Settings file: {}", settings_path.display());
            println!("Legacy key:    {}", legacy_api_key_path().display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "accounts_file": accounts_path.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }
    Ok(())
}

async fn set_region(ctx: &AppContext, region: &str) -> Result<()> {
    let region: Region = region.parse()?;
    ctx.settings.set_default_region(region).await;
    ctx.settings.save().await?;

    info!(region = %region, "Default region updated");
    println!("Default region set to: {} ({})", region, region.display_name());
    Ok(())
}

async fn set_api_key(ctx: &AppContext, key: &str) -> Result<()> {
    ctx.api_keys().store(key).await?;
    println!("API key stored in the system keychain");
    Ok(())
}

async fn clear_api_key(ctx: &AppContext) -> Result<()> {
    if ctx.api_keys().delete().await? {
        println!("API key removed");
    } else {
        println!("No stored API key to remove");
    }
    Ok(())
}

/// Shows the first few characters of a key and hides the rest.
fn mask(key: &str) -> String {
    let visible: String = key.chars().take(5).collect();
    let hidden = key.strip_prefix(&visible).unwrap_or(key);
    format!("{visible}{}", redact(hidden, hidden))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_hides_tail() {
        let masked = mask("HDEV-1234-abcd");
        assert!(masked.starts_with("HDEV-"));
        assert!(!masked.contains("abcd"));
    }
}
