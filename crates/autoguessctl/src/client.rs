//! HTTP client for communicating with autoguessd.

use anyhow::{anyhow, Context, Result};
use autoguess_common::protocol::{GUESS_PATH, START_ROUND_PATH};
use autoguess_common::{
    ErrorResponse, GuessRequest, GuessResponse, StartRoundRequest, StartRoundResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Default server base URL
pub const DEFAULT_SERVER: &str = "http://localhost:8000";

/// Starting a round waits on the suggestion source
pub const START_TIMEOUT: Duration = Duration::from_secs(10);

/// Guessing waits on model inference, possibly behind other guesses on the
/// same round. Kept well above the server's default judge timeout so a slow
/// verdict is still received instead of being scored behind our back.
pub const GUESS_TIMEOUT: Duration = Duration::from_secs(90);

/// Client for the start/guess API
pub struct GameClient {
    http_client: reqwest::Client,
    base_url: String,
    start_timeout: Duration,
    guess_timeout: Duration,
}

impl GameClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            start_timeout: START_TIMEOUT,
            guess_timeout: GUESS_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, start: Duration, guess: Duration) -> Self {
        self.start_timeout = start;
        self.guess_timeout = guess;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a new round for `prefix`
    pub async fn start_round(
        &self,
        prefix: &str,
        maximum_strikes: Option<u32>,
    ) -> Result<StartRoundResponse> {
        let request = StartRoundRequest {
            search_term_prefix: prefix.to_string(),
            maximum_strikes,
        };
        self.post(START_ROUND_PATH, &request, self.start_timeout)
            .await
            .context("Failed to start round")
    }

    /// Submit a full guess (prefix already prepended)
    pub async fn guess(&self, round_identifier: &str, guess_text: &str) -> Result<GuessResponse> {
        let request = GuessRequest {
            round_identifier: round_identifier.to_string(),
            guess_text: guess_text.to_string(),
        };
        self.post(GUESS_PATH, &request, self.guess_timeout)
            .await
            .context("Guess request failed")
    }

    async fn post<B, T>(&self, path: &str, body: &B, timeout: Duration) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| anyhow!("Cannot reach server at {}: {}", self.base_url, e))?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(anyhow!("Server returned {}: {}", status, message));
        }

        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Server sent an unexpected response ({}): {}", e, text))
    }
}
