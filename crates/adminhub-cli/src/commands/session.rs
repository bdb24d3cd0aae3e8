//! Online session CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use adminhub_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List online sessions
    List,
    /// Count online sessions
    Count,
    /// Force a session to log out
    Kill {
        /// Access token id of the session
        id: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Token ID
    token_id: String,
    /// User
    user: String,
    /// IP Address
    ip: String,
    /// Region
    region: String,
    /// Client
    client: String,
    /// Logged in
    created: String,
    /// Expires in
    expires_in: String,
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let manager = super::connect_manager(&config).await?;

    match &args.command {
        SessionCommand::List => {
            let sessions = manager.list_sessions().await?;

            let mut rows = Vec::with_capacity(sessions.len());
            for s in sessions {
                let expires_in = manager
                    .session_ttl(&s.access_token_id)
                    .await?
                    .map(|ttl| format!("{}s", ttl.as_secs()))
                    .unwrap_or_else(|| "-".to_string());

                rows.push(SessionRow {
                    token_id: s.access_token_id,
                    user: s.principal_name,
                    ip: s.client_ip,
                    region: s.geo_region,
                    client: format!("{} / {}", s.browser, s.os),
                    created: s.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    expires_in,
                });
            }

            output::print_list(&rows, format);
        }
        SessionCommand::Count => {
            let count = manager.count_sessions().await?;
            println!("Online sessions: {count}");
        }
        SessionCommand::Kill { id, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Force session {id} to log out?"))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let record = manager.force_logout(id).await?;
            output::print_success(&format!(
                "Session {id} of {} logged out",
                record.principal_name
            ));
        }
    }

    Ok(())
}
