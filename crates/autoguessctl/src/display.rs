//! Terminal rendering for the board.

use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::board::{Board, Feedback, Tile};

/// Color only when stdout is a terminal.
pub fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

fn tile_text(tile: &Tile) -> String {
    match tile {
        Tile::Hidden => "???".to_string(),
        Tile::Guessed(text) | Tile::Missed(text) => text.clone(),
        Tile::Unknown => "(not guessed)".to_string(),
    }
}

/// One line per answer slot, numbered from 1.
pub fn render_board(board: &Board, color: bool) -> String {
    if board.answers.is_empty() {
        return "  (no suggestions for this prefix)".to_string();
    }

    board
        .tiles()
        .iter()
        .enumerate()
        .map(|(index, tile)| {
            let text = format!(" {:>2}. {} ", index + 1, tile_text(tile));
            let text = if color {
                match tile {
                    Tile::Guessed(_) => text.on_green().black().to_string(),
                    Tile::Missed(_) | Tile::Unknown => text.on_red().white().to_string(),
                    Tile::Hidden => text.on_bright_black().white().to_string(),
                }
            } else {
                text
            };
            format!("  {}", text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_status(board: &Board) -> String {
    format!(
        "Prefix: {}   Score: {}   Strikes: {}/{}",
        board.prefix, board.score, board.strikes, board.maximum_strikes
    )
}

pub fn feedback_message(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Correct { index } => format!("Correct! Answer #{} revealed.", index + 1),
        Feedback::AlreadyGuessed => {
            "You already found that one (no points, no strike).".to_string()
        }
        Feedback::Wrong {
            strikes,
            maximum_strikes,
        } => format!("Wrong! Strikes: {}/{}", strikes, maximum_strikes),
        Feedback::GameOver => "Game over! All answers revealed.".to_string(),
    }
}
