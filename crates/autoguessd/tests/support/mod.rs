//! In-memory stand-ins for the suggestion source and the judge.

#![allow(dead_code)]

use async_trait::async_trait;
use autoguess_common::GameError;
use autoguessd::{Judge, JudgeFormatError, RoundEngine, RoundStore, SuggestionSource, Verdict};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Returns the same raw terms for every prefix, filtered like the real source.
pub struct FixedSource {
    terms: Vec<String>,
}

impl FixedSource {
    pub fn new(terms: &[&str]) -> Self {
        Self {
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[async_trait]
impl SuggestionSource for FixedSource {
    async fn fetch(&self, prefix: &str) -> Result<Vec<String>, GameError> {
        Ok(autoguessd::suggest::filter_candidates(
            prefix,
            self.terms.iter().cloned(),
        ))
    }
}

pub struct FailingSource;

#[async_trait]
impl SuggestionSource for FailingSource {
    async fn fetch(&self, _prefix: &str) -> Result<Vec<String>, GameError> {
        Err(GameError::SuggestionSource("connection refused".to_string()))
    }
}

/// Replays queued verdicts in order; an empty queue answers no-match.
#[derive(Default)]
pub struct ScriptedJudge {
    script: Mutex<VecDeque<Result<Verdict, JudgeFormatError>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedJudge {
    pub fn new(script: Vec<Result<Verdict, JudgeFormatError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    async fn judge(&self, _guess: &str, _candidates: &[String]) -> Result<Verdict, JudgeFormatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        next.unwrap_or(Ok(Verdict::no_match()))
    }
}

pub fn engine(source: impl SuggestionSource + 'static, judge: Arc<ScriptedJudge>) -> RoundEngine {
    RoundEngine::new(Arc::new(RoundStore::new()), Arc::new(source), judge, 5)
}

pub fn cat_source() -> FixedSource {
    FixedSource::new(&["cats", "category", "catalog"])
}
