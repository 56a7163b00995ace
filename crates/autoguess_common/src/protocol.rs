//! Wire types for the start/guess HTTP protocol.
//!
//! Field names are part of the public contract with browser and terminal
//! clients; do not rename them.

use serde::{Deserialize, Serialize};

pub const START_ROUND_PATH: &str = "/api/start_round";
pub const GUESS_PATH: &str = "/api/guess";
pub const HEALTH_PATH: &str = "/v1/health";

/// Ceiling used when a start request omits `maximum_strikes`.
pub const DEFAULT_MAXIMUM_STRIKES: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRoundRequest {
    pub search_term_prefix: String,
    /// Falls back to the server's configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_strikes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartRoundResponse {
    pub round_identifier: String,
    pub masked_answers: Vec<Option<String>>,
    pub maximum_strikes: u32,
    pub search_term_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessRequest {
    pub round_identifier: String,
    pub guess_text: String,
}

/// What a single guess did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessOutcome {
    /// No candidate matched; a strike was recorded.
    Miss,
    /// A hidden candidate was revealed and scored.
    Hit,
    /// The matched candidate was already revealed; nothing changed.
    Repeat,
    /// The round had already ended; nothing changed.
    RoundOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessResponse {
    pub is_correct: bool,
    pub correct_index: i64,
    pub revealed_answers: Vec<Option<String>>,
    pub score: u32,
    pub strikes: u32,
    pub game_over: bool,
    pub search_term_prefix: String,
    pub outcome: GuessOutcome,
}

/// Body returned with every non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub active_rounds: usize,
}
