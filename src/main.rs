use clap::Parser;
use session_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Replay(args) => cli::replay::run(config, args).await,
        Command::Config => cli::show_config::run(&config),
    }
}
