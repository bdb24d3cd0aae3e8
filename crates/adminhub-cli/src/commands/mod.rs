//! CLI command definitions and dispatch.

pub mod config;
pub mod password;
pub mod session;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use adminhub_auth::jwt::TokenCodec;
use adminhub_auth::session::{SessionManager, SessionPolicy, SessionStore, TracingAuditor};
use adminhub_cache::CacheManager;
use adminhub_core::config::AppConfig;
use adminhub_core::error::AppError;

use crate::output::OutputFormat;

/// AdminHub session administration
#[derive(Debug, Parser)]
#[command(name = "adminhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Online session management
    Session(session::SessionArgs),
    /// Token inspection
    Token(token::TokenArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Hash a password for the accounts table
    HashPassword(password::HashPasswordArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Session(args) => session::execute(args, &self.config, self.format).await,
            Commands::Token(args) => token::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
            Commands::HashPassword(args) => password::execute(args),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_from(config_path)
}

/// Helper: connect to the configured session store
///
/// Only the Redis backend is shared with a running server; an in-memory
/// store opened here is empty.
pub async fn connect_manager(config: &AppConfig) -> Result<SessionManager, AppError> {
    if config.cache.provider != "redis" {
        crate::output::print_warning(
            "cache.provider is not redis; the CLI sees its own empty in-memory store",
        );
    }

    let cache = CacheManager::new(&config.cache).await?;
    let store = SessionStore::new(Arc::new(cache), config.session.store_timeout());

    Ok(SessionManager::new(
        Arc::new(TokenCodec::new(&config.auth)),
        store,
        Arc::new(TracingAuditor),
        SessionPolicy::from_config(&config.auth),
    ))
}
