//! Shared types for autoguess components.
//!
//! The wire protocol, error taxonomy, point table and configuration used by
//! both the `autoguessd` server and the `autoguessctl` client.

pub mod config;
pub mod error;
pub mod points;
pub mod protocol;

pub use config::Config;
pub use error::GameError;
pub use points::{points_for, MAX_CANDIDATES, POINTS_BY_INDEX};
pub use protocol::{
    ErrorResponse, GuessOutcome, GuessRequest, GuessResponse, HealthResponse,
    StartRoundRequest, StartRoundResponse, DEFAULT_MAXIMUM_STRIKES,
};

/// Crate version, reported by the health endpoint and `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
