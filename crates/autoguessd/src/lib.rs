//! Autoguess daemon library - exposes modules for testing.

pub mod engine;
pub mod judge;
pub mod round;
pub mod routes;
pub mod server;
pub mod store;
pub mod suggest;

pub use engine::RoundEngine;
pub use judge::{Judge, JudgeFormatError, OllamaJudge, Verdict};
pub use round::Round;
pub use server::AppState;
pub use store::{RoundId, RoundStore};
pub use suggest::{BilibiliSuggestions, SuggestionSource};
