//! Replay command - feeds a recorded conversation through the session cache
//!
//! Each turn follows the chat pipeline's order: enrich the question with
//! context, try the cache, store the recorded answer on a miss, then record
//! the turn in the session history.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::{Deserialize, Serialize};
use tokio::signal;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::session_cache::{CacheHit, SessionCacheService, SessionStats};
use crate::infrastructure::logging;

/// Arguments for the replay command
#[derive(Args, Clone, Debug)]
pub struct ReplayArgs {
    /// JSON file holding an array of {session_id, query, response} turns
    #[arg(long, short)]
    pub transcript: PathBuf,

    /// Do not record turns in the context history
    #[arg(long)]
    pub no_context: bool,
}

/// One recorded exchange
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptTurn {
    pub session_id: String,
    pub query: String,
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct TurnOutcome {
    pub session_id: String,
    pub query: String,
    /// Question as it would be sent to the router
    pub enhanced_query: String,
    pub cache_hit: Option<CacheHit>,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub turns: Vec<TurnOutcome>,
    pub stats: SessionStats,
}

pub async fn run(config: AppConfig, args: ReplayArgs) -> anyhow::Result<()> {
    logging::init_logging(&config.logging);

    let transcript = load_transcript(&args.transcript)?;
    let manager = crate::create_cache_manager(&config)?;

    info!(
        turns = transcript.len(),
        "Replaying {}",
        args.transcript.display()
    );

    let report = tokio::select! {
        report = replay(manager.as_ref(), &transcript, !args.no_context) => report,
        _ = signal::ctrl_c() => {
            warn!("Replay interrupted");
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

pub fn load_transcript(path: &Path) -> anyhow::Result<Vec<TranscriptTurn>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse transcript {}", path.display()))
}

pub async fn replay(
    service: &dyn SessionCacheService,
    transcript: &[TranscriptTurn],
    record_context: bool,
) -> ReplayReport {
    let mut turns = Vec::with_capacity(transcript.len());

    for turn in transcript {
        let enhanced_query = service
            .get_context_for_query(&turn.session_id, &turn.query)
            .await;

        let cache_hit = service
            .check_semantic_cache_detailed(&turn.query, &turn.session_id)
            .await;

        if cache_hit.is_none() {
            service
                .add_to_semantic_cache(&turn.query, &turn.response, &turn.session_id)
                .await;
        }

        if record_context {
            let answer = cache_hit
                .as_ref()
                .map_or(turn.response.as_str(), |hit| hit.response.as_str());
            service
                .add_to_context(&turn.session_id, &turn.query, answer)
                .await;
        }

        turns.push(TurnOutcome {
            session_id: turn.session_id.clone(),
            query: turn.query.clone(),
            enhanced_query,
            cache_hit,
        });
    }

    ReplayReport {
        turns,
        stats: service.get_session_stats().await,
    }
}
