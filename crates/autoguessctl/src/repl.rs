//! Interactive play loop.
//!
//! Lines starting with `:` are commands; anything else is a suffix guess.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::board::{Board, Feedback};
use crate::client::GameClient;
use crate::display::{feedback_message, render_board, render_status, use_color};

/// Parsed REPL input
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    NewRound {
        prefix: String,
        maximum_strikes: Option<u32>,
    },
    Show,
    Help,
    Quit,
    Guess(String),
    Invalid(String),
}

pub fn parse_input(line: &str) -> Input {
    let Some(command) = line.strip_prefix(':') else {
        return Input::Guess(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("new") => {
            let rest: Vec<&str> = parts.collect();
            // A trailing number is the strike limit; the rest is the prefix
            let (prefix_parts, maximum_strikes) = match rest.split_last() {
                Some((last, init)) if !init.is_empty() => match last.parse::<u32>() {
                    Ok(n) => (init.to_vec(), Some(n)),
                    Err(_) => (rest.clone(), None),
                },
                _ => (rest.clone(), None),
            };
            if prefix_parts.is_empty() {
                Input::Invalid("usage: :new <prefix> [max_strikes]".to_string())
            } else {
                Input::NewRound {
                    prefix: prefix_parts.join(" "),
                    maximum_strikes,
                }
            }
        }
        Some("show") => Input::Show,
        Some("help") => Input::Help,
        Some("quit") | Some("q") | Some("exit") => Input::Quit,
        _ => Input::Invalid(format!("unknown command: {}", line)),
    }
}

const HELP: &str = "\
Type the rest of a suggestion to guess it (the prefix is added for you).
  :new <prefix> [max_strikes]   start a new round
  :show                         redraw the board
  :quit                         leave";

struct Session {
    client: GameClient,
    board: Option<Board>,
    color: bool,
}

impl Session {
    async fn start(&mut self, prefix: &str, maximum_strikes: Option<u32>) {
        match self.client.start_round(prefix, maximum_strikes).await {
            Ok(start) => {
                let board = Board::from_start(start);
                println!(
                    "New round! Prefix: {}   Max strikes: {}",
                    board.prefix, board.maximum_strikes
                );
                println!("{}", render_board(&board, self.color));
                self.board = Some(board);
            }
            Err(e) => eprintln!("{:#}", e),
        }
    }

    async fn guess(&mut self, suffix: &str) {
        let Some(board) = self.board.as_mut() else {
            println!("Start a round first (:new <prefix>).");
            return;
        };
        if board.game_over {
            println!("This round is over. Start another with :new <prefix>.");
            return;
        }
        let Some(full_guess) = board.compose_guess(suffix) else {
            println!("Type a guess first.");
            return;
        };

        match self.client.guess(&board.round_identifier, &full_guess).await {
            Ok(response) => {
                let feedback = board.apply_guess(response);
                println!("{}", feedback_message(&feedback));
                println!("{}", render_board(board, self.color));
                println!("{}", render_status(board));
                if feedback == Feedback::GameOver {
                    println!("Final score: {}", board.score);
                }
            }
            Err(e) => eprintln!("{:#}", e),
        }
    }

    fn show(&self) {
        match &self.board {
            Some(board) => {
                println!("{}", render_board(board, self.color));
                println!("{}", render_status(board));
            }
            None => println!("No round in progress."),
        }
    }
}

/// Run the interactive loop until `:quit` or end of input
pub async fn run(
    client: GameClient,
    prefix: Option<String>,
    maximum_strikes: Option<u32>,
) -> Result<()> {
    let mut session = Session {
        client,
        board: None,
        color: use_color(),
    };

    println!("Autocomplete guessing game (server: {})", session.client.base_url());
    println!("{}", HELP);

    if let Some(prefix) = prefix {
        session.start(&prefix, maximum_strikes).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(line.trim_end_matches('\r')) {
            Input::NewRound {
                prefix,
                maximum_strikes: strikes,
            } => session.start(&prefix, strikes.or(maximum_strikes)).await,
            Input::Show => session.show(),
            Input::Help => println!("{}", HELP),
            Input::Quit => break,
            Input::Guess(suffix) => session.guess(&suffix).await,
            Input::Invalid(message) => println!("{}", message),
        }
    }

    Ok(())
}
