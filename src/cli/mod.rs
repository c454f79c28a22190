//! CLI module for the session cache
//!
//! Provides subcommands for exercising the cache outside the chat service:
//! - `replay`: run a recorded conversation through the cache and report hits
//! - `config`: print the effective configuration

pub mod replay;
pub mod show_config;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Session cache - semantic answer cache and conversation context for the cooking assistant
#[derive(Parser)]
#[command(name = "session-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to config/default and config/local)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a recorded conversation through the cache
    Replay(replay::ReplayArgs),

    /// Print the effective configuration as JSON
    Config,
}

/// Load `.env`, then the layered configuration or an explicit file
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AppConfig::load().context("Failed to load configuration")?,
    };

    Ok(config)
}
