//! Error types shared by the server and the client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    /// The suggestion source could not produce a candidate list.
    #[error("Suggestion source error: {0}")]
    SuggestionSource(String),

    #[error("Round not found: {0}")]
    RoundNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// HTTP status code the boundary layer reports for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GameError::SuggestionSource(_) => 502,
            GameError::RoundNotFound(_) => 404,
            GameError::InvalidRequest(_) => 400,
            GameError::Internal(_) => 500,
        }
    }

    /// Stable machine-readable kind, carried in error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::SuggestionSource(_) => "suggestion_source",
            GameError::RoundNotFound(_) => "round_not_found",
            GameError::InvalidRequest(_) => "invalid_request",
            GameError::Internal(_) => "internal",
        }
    }

    /// Client errors are the caller's fault; everything else is ours or upstream's.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_not_found_is_client_error() {
        let err = GameError::RoundNotFound("abc".to_string());
        assert_eq!(err.status_code(), 404);
        assert!(err.is_client_error());
        assert_eq!(err.kind(), "round_not_found");
    }

    #[test]
    fn test_suggestion_source_is_upstream_error() {
        let err = GameError::SuggestionSource("timeout".to_string());
        assert_eq!(err.status_code(), 502);
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "Suggestion source error: timeout");
    }
}
