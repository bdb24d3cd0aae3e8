//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use adminhub_cache::redis::mask_redis_url;
use adminhub_core::config::AppConfig;
use adminhub_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
    /// Validate configuration file
    Validate,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            output::print_item(&redacted(config), format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{config_path}' is valid"));
                output::print_kv("Server", &config.server.bind_address());
                output::print_kv("Store", &config.cache.provider);
                output::print_kv(
                    "Access TTL",
                    &format!("{}s", config.auth.access_token_ttl_seconds),
                );
                output::print_kv(
                    "Refresh TTL",
                    &format!("{}s", config.auth.refresh_token_ttl_seconds),
                );
                output::print_kv(
                    "Single login",
                    &config.auth.single_login_enabled.to_string(),
                );
                output::print_kv("Accounts", &config.accounts.len().to_string());
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {e}"));
                return Err(e);
            }
        },
    }

    Ok(())
}

/// Copy of the configuration safe to print.
fn redacted(mut config: AppConfig) -> AppConfig {
    config.auth.signing_secret = "****".to_string();
    config.cache.redis.url = mask_redis_url(&config.cache.redis.url);
    for account in &mut config.accounts {
        account.password_hash = "****".to_string();
    }
    config
}
