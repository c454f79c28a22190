//! Config command - prints the effective configuration

use crate::config::AppConfig;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&config.redacted())?);
    Ok(())
}
