//! Autoguess control library - exposes client modules for testing.

pub mod board;
pub mod cli;
pub mod client;
pub mod display;
pub mod repl;

pub use board::{Board, Feedback, Tile};
pub use client::GameClient;
