//! LLM judge adapter.
//!
//! The judge is a local Ollama model that receives the guess plus the
//! numbered candidate list and answers `{"is_correct": .., "correct_index": ..}`.
//! Small models are sloppy with JSON, so parsing is tolerant: prose or code
//! fences around the object are stripped, and `"true"`/`1`/`"2"` style values
//! are coerced. Anything still unusable is a [`JudgeFormatError`], which
//! [`adjudicate`] turns into a plain no-match verdict. A bad judge never ends
//! a round; it costs the player a strike at worst.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Sentinel index meaning "no candidate matched".
pub const NO_MATCH_INDEX: i64 = -1;

/// Upper bound on one judge call when none is configured.
pub const DEFAULT_JUDGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Structural verdict for one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub is_correct: bool,
    pub correct_index: i64,
}

impl Verdict {
    pub const fn no_match() -> Self {
        Self {
            is_correct: false,
            correct_index: NO_MATCH_INDEX,
        }
    }

    pub const fn matched(index: i64) -> Self {
        Self {
            is_correct: true,
            correct_index: index,
        }
    }

    /// Force out-of-range indices and "correct at -1" style contradictions
    /// to no-match. Never clamps.
    pub fn validated(self, candidate_count: usize) -> Self {
        match self.matched_index() {
            Some(index) if index < candidate_count => self,
            _ => Self::no_match(),
        }
    }

    /// The matched position, if the verdict names one.
    pub fn matched_index(&self) -> Option<usize> {
        if !self.is_correct {
            return None;
        }
        usize::try_from(self.correct_index).ok()
    }
}

/// Reasons a verdict could not be obtained. Internal only.
#[derive(Error, Debug)]
pub enum JudgeFormatError {
    #[error("judge request failed: {0}")]
    Transport(String),

    #[error("judge returned HTTP {0}")]
    Status(u16),

    #[error("judge envelope unusable: {0}")]
    Envelope(String),

    #[error("judge returned an empty payload")]
    EmptyPayload,

    #[error("judge payload is not a JSON object: {0}")]
    Payload(String),

    #[error("judge payload is missing field {0}")]
    MissingField(&'static str),

    #[error("judge field {field} has unusable value {value}")]
    BadField { field: &'static str, value: String },
}

/// A semantic-equivalence judge.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Ask the judge for a verdict. Errors are reported, not hidden; callers
    /// go through [`adjudicate`] to apply the no-match policy.
    async fn judge(&self, guess: &str, candidates: &[String]) -> Result<Verdict, JudgeFormatError>;
}

/// Ask the judge and degrade any failure to [`Verdict::no_match`].
///
/// The call is cut off after `limit` whatever the judge implementation does
/// internally, so a hung model costs one strike and releases the round.
pub async fn adjudicate(
    judge: &dyn Judge,
    guess: &str,
    candidates: &[String],
    limit: Duration,
) -> Verdict {
    match tokio::time::timeout(limit, judge.judge(guess, candidates)).await {
        Ok(Ok(verdict)) => verdict,
        Ok(Err(e)) => {
            warn!("Judge verdict unusable, scoring as no match: {}", e);
            Verdict::no_match()
        }
        Err(_) => {
            warn!(
                "Judge gave no verdict within {}ms, scoring as no match",
                limit.as_millis()
            );
            Verdict::no_match()
        }
    }
}

/// Build the plain-text prompt sent to the judge model.
pub fn build_judge_prompt(guess: &str, candidates: &[String]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(candidates.len() + 6);
    lines.push("Guess:".to_string());
    lines.push(guess.to_string());
    lines.push(String::new());
    lines.push("Answers:".to_string());
    for (index, candidate) in candidates.iter().enumerate() {
        lines.push(format!("{}: {}", index, candidate));
    }
    lines.push(String::new());
    lines.push("Return JSON only.".to_string());
    lines.join("\n")
}

/// Extract JSON from text that may have prose or code fences around it
fn extract_json(text: &str) -> &str {
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return &text[start..=end];
        }
    }
    text
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_index(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse the model's textual answer into a verdict.
pub fn parse_verdict(raw: &str) -> Result<Verdict, JudgeFormatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(JudgeFormatError::EmptyPayload);
    }

    let value: Value = serde_json::from_str(extract_json(trimmed))
        .map_err(|e| JudgeFormatError::Payload(e.to_string()))?;
    if !value.is_object() {
        return Err(JudgeFormatError::Payload(format!("expected object, got {}", value)));
    }

    let is_correct = value
        .get("is_correct")
        .ok_or(JudgeFormatError::MissingField("is_correct"))?;
    let is_correct = coerce_bool(is_correct).ok_or_else(|| JudgeFormatError::BadField {
        field: "is_correct",
        value: is_correct.to_string(),
    })?;

    let correct_index = value
        .get("correct_index")
        .ok_or(JudgeFormatError::MissingField("correct_index"))?;
    let correct_index = coerce_index(correct_index).ok_or_else(|| JudgeFormatError::BadField {
        field: "correct_index",
        value: correct_index.to_string(),
    })?;

    Ok(Verdict {
        is_correct,
        correct_index,
    })
}

/// Ollama-backed judge using the non-streaming generate API.
pub struct OllamaJudge {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaJudge {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Judge for OllamaJudge {
    async fn judge(&self, guess: &str, candidates: &[String]) -> Result<Verdict, JudgeFormatError> {
        let prompt = build_judge_prompt(guess, candidates);
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "format": "json"
        });

        info!("[>]  JUDGE CALL [{}] ({} candidates)", self.model, candidates.len());
        debug!("[U]  JUDGE PROMPT ({} chars): {}", prompt.len(), prompt);

        let start = std::time::Instant::now();
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| JudgeFormatError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JudgeFormatError::Status(response.status().as_u16()));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| JudgeFormatError::Envelope(e.to_string()))?;
        let raw = envelope
            .get("response")
            .and_then(|r| r.as_str())
            .ok_or_else(|| JudgeFormatError::Envelope("no response field".to_string()))?;

        info!(
            "[<]  JUDGE RESPONSE ({} chars, {}ms)",
            raw.len(),
            start.elapsed().as_millis()
        );
        debug!("[<]  JUDGE RAW: {}", raw);

        parse_verdict(raw)
    }
}
