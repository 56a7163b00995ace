//! Round state and its transition rules.
//!
//! A round is ACTIVE until `strikes >= maximum_strikes`, then TERMINAL
//! forever. Entering TERMINAL reveals every candidate in the same step.

use autoguess_common::{points_for, GuessOutcome, MAX_CANDIDATES};

use crate::judge::Verdict;

#[derive(Debug, Clone)]
pub struct Round {
    prefix: String,
    candidates: Vec<String>,
    revealed: Vec<bool>,
    score: u32,
    strikes: u32,
    maximum_strikes: u32,
}

impl Round {
    pub fn new(prefix: impl Into<String>, mut candidates: Vec<String>, maximum_strikes: u32) -> Self {
        candidates.truncate(MAX_CANDIDATES);
        let revealed = vec![false; candidates.len()];
        Self {
            prefix: prefix.into(),
            candidates,
            revealed,
            score: 0,
            strikes: 0,
            maximum_strikes,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    pub fn maximum_strikes(&self) -> u32 {
        self.maximum_strikes
    }

    pub fn is_terminal(&self) -> bool {
        self.strikes >= self.maximum_strikes
    }

    /// Every position hidden, whatever has been revealed so far.
    pub fn masked_answers(&self) -> Vec<Option<String>> {
        vec![None; self.candidates.len()]
    }

    /// Full text for revealed positions, `None` for hidden ones.
    pub fn revealed_answers(&self) -> Vec<Option<String>> {
        self.candidates
            .iter()
            .zip(&self.revealed)
            .map(|(text, &shown)| shown.then(|| text.clone()))
            .collect()
    }

    /// Reconcile a judge verdict into round state.
    ///
    /// Returns the outcome together with the verdict as validated against
    /// this round's candidates. A terminal round is left untouched.
    pub fn apply_verdict(&mut self, verdict: Verdict) -> (GuessOutcome, Verdict) {
        if self.is_terminal() {
            return (GuessOutcome::RoundOver, Verdict::no_match());
        }

        let verdict = verdict.validated(self.candidates.len());
        let outcome = match verdict.matched_index() {
            None => {
                self.strikes += 1;
                GuessOutcome::Miss
            }
            Some(index) if self.revealed[index] => GuessOutcome::Repeat,
            Some(index) => {
                self.revealed[index] = true;
                self.score += points_for(index).unwrap_or(0);
                GuessOutcome::Hit
            }
        };

        if self.is_terminal() {
            self.revealed.iter_mut().for_each(|flag| *flag = true);
        }

        (outcome, verdict)
    }
}
