//! Autoguess Control - terminal client for the autoguess server

use anyhow::Result;
use autoguessctl::cli::{Cli, Commands};
use autoguessctl::{repl, GameClient};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = GameClient::new(&cli.server);

    match cli.command {
        None => repl::run(client, None, None).await,
        Some(Commands::Play {
            prefix,
            max_strikes,
        }) => repl::run(client, prefix, max_strikes).await,
        Some(Commands::Start {
            prefix,
            max_strikes,
        }) => {
            let response = client.start_round(&prefix, max_strikes).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Some(Commands::Guess { round_id, text }) => {
            let response = client.guess(&round_id, &text).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
