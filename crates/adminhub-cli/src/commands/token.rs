//! Token inspection CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;

use adminhub_auth::jwt::TokenCodec;
use adminhub_cache::Namespace;
use adminhub_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Verify a token and show its claims and store status
    Inspect {
        /// The encoded token
        token: String,
        /// Only check the signature, do not consult the store
        #[arg(long)]
        offline: bool,
    },
}

/// What the inspected token resolves to.
#[derive(Debug, Serialize)]
struct TokenReport {
    token_id: String,
    principal_name: String,
    issued_at: i64,
    expires_at: String,
    remaining_seconds: u64,
    resolves_to: Option<String>,
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    match &args.command {
        TokenCommand::Inspect { token, offline } => {
            let claims = TokenCodec::new(&config.auth).verify(token.trim())?;

            let resolves_to = if *offline {
                None
            } else {
                let manager = super::connect_manager(&config).await?;
                let store = manager.store();
                let kind = if store.get_record(&claims.token_id).await?.is_some() {
                    "access session"
                } else if let Some(access_id) =
                    store.get(Namespace::RefreshMapping, &claims.token_id).await?
                {
                    if store.get_record(&access_id).await?.is_some() {
                        "refresh mapping (session live)"
                    } else {
                        "refresh mapping (session ended)"
                    }
                } else {
                    "nothing (revoked or expired)"
                };
                Some(kind.to_string())
            };

            let report = TokenReport {
                token_id: claims.token_id.clone(),
                principal_name: claims.principal_name.clone(),
                issued_at: claims.iat,
                expires_at: claims.expires_at().to_rfc3339(),
                remaining_seconds: claims.remaining_ttl_seconds(),
                resolves_to,
            };

            match format {
                OutputFormat::Json => output::print_item(&report, format),
                OutputFormat::Table => {
                    output::print_success("Signature valid");
                    output::print_kv("Token ID", &report.token_id);
                    output::print_kv("Principal", &report.principal_name);
                    output::print_kv("Expires", &report.expires_at);
                    output::print_kv("Remaining", &format!("{}s", report.remaining_seconds));
                    if let Some(kind) = &report.resolves_to {
                        output::print_kv("Resolves to", kind);
                    }
                }
            }
        }
    }

    Ok(())
}
