//! Autoguess Daemon - autocomplete guessing game server
//!
//! Fetches suggestions for a prefix, hides them, and scores guesses with a
//! local LLM judge.

use anyhow::Result;
use autoguess_common::{Config, VERSION};
use autoguessd::{server, AppState};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autoguessd")]
#[command(about = "Autocomplete guessing game server", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Config file (overrides $AUTOGUESS_CONFIG and /etc/autoguess/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8000
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    info!("Autoguess Daemon v{} starting", VERSION);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }

    let state = AppState::from_config(&config)?;
    server::run(state, &config).await
}
