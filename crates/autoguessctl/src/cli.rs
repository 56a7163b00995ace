//! CLI - Command-line argument parsing

use autoguess_common::VERSION;
use clap::{Parser, Subcommand};

use crate::client::DEFAULT_SERVER;

/// Autoguess CLI
#[derive(Parser)]
#[command(name = "autoguessctl")]
#[command(about = "Autoguess - guess the hidden autocomplete suggestions", long_about = None)]
#[command(version = VERSION)]
pub struct Cli {
    /// Server base URL
    #[arg(long, global = true, env = "AUTOGUESS_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Subcommand (if not provided, starts interactive play)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Play interactively
    Play {
        /// Start right away with this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Strikes allowed before the round ends
        #[arg(long)]
        max_strikes: Option<u32>,
    },

    /// Start a round and print the response as JSON
    Start {
        prefix: String,

        #[arg(long)]
        max_strikes: Option<u32>,
    },

    /// Submit one guess and print the response as JSON
    Guess {
        round_id: String,

        /// Full guess text, prefix included
        text: String,
    },
}
