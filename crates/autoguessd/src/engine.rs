//! Round engine - the start/guess state machine.

use autoguess_common::{GameError, GuessOutcome, GuessResponse, StartRoundResponse};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::judge::{adjudicate, Judge, Verdict, DEFAULT_JUDGE_TIMEOUT};
use crate::round::Round;
use crate::store::{RoundLease, RoundStore};
use crate::suggest::SuggestionSource;

pub struct RoundEngine {
    store: Arc<RoundStore>,
    suggestions: Arc<dyn SuggestionSource>,
    judge: Arc<dyn Judge>,
    judge_timeout: Duration,
    default_maximum_strikes: u32,
}

impl RoundEngine {
    pub fn new(
        store: Arc<RoundStore>,
        suggestions: Arc<dyn SuggestionSource>,
        judge: Arc<dyn Judge>,
        default_maximum_strikes: u32,
    ) -> Self {
        Self {
            store,
            suggestions,
            judge,
            judge_timeout: DEFAULT_JUDGE_TIMEOUT,
            default_maximum_strikes,
        }
    }

    /// Cap on a single judge call; past it the guess scores as a miss.
    pub fn with_judge_timeout(mut self, judge_timeout: Duration) -> Self {
        self.judge_timeout = judge_timeout;
        self
    }

    pub fn store(&self) -> &Arc<RoundStore> {
        &self.store
    }

    /// Start a round: fetch candidates, store a fresh round, return it masked.
    ///
    /// Nothing is stored when the suggestion source fails.
    pub async fn start(
        &self,
        prefix: &str,
        maximum_strikes: Option<u32>,
    ) -> Result<StartRoundResponse, GameError> {
        let maximum_strikes = maximum_strikes.unwrap_or(self.default_maximum_strikes);
        if maximum_strikes == 0 {
            return Err(GameError::InvalidRequest(
                "maximum_strikes must be at least 1".to_string(),
            ));
        }

        let candidates = self.suggestions.fetch(prefix).await?;
        let round = Round::new(prefix, candidates, maximum_strikes);
        let masked_answers = round.masked_answers();
        let id = self.store.create(round).await;

        info!(
            "Round {} started: prefix {:?}, {} candidates, {} strikes allowed",
            id,
            prefix,
            masked_answers.len(),
            maximum_strikes
        );

        Ok(StartRoundResponse {
            round_identifier: id.to_string(),
            masked_answers,
            maximum_strikes,
            search_term_prefix: prefix.to_string(),
        })
    }

    /// Judge a guess and fold the verdict into the round.
    ///
    /// The round stays locked from lookup to response, so concurrent guesses
    /// on one round apply one after another.
    pub async fn guess(&self, round_id: &str, guess_text: &str) -> Result<GuessResponse, GameError> {
        let mut lease = self.store.checkout(round_id).await?;

        if lease.is_terminal() {
            info!("Round {} already over, ignoring guess", round_id);
            return Ok(view(&lease, GuessOutcome::RoundOver, Verdict::no_match()));
        }

        let verdict = adjudicate(
            self.judge.as_ref(),
            guess_text,
            lease.candidates(),
            self.judge_timeout,
        )
        .await;
        let (outcome, verdict) = lease.apply_verdict(verdict);

        info!(
            "Round {} guess {:?}: {:?} (index {}), score {}, strikes {}/{}",
            round_id,
            guess_text,
            outcome,
            verdict.correct_index,
            lease.score(),
            lease.strikes(),
            lease.maximum_strikes()
        );

        Ok(view(&lease, outcome, verdict))
    }
}

fn view(round: &RoundLease, outcome: GuessOutcome, verdict: Verdict) -> GuessResponse {
    GuessResponse {
        is_correct: verdict.is_correct,
        correct_index: verdict.correct_index,
        revealed_answers: round.revealed_answers(),
        score: round.score(),
        strikes: round.strikes(),
        game_over: round.is_terminal(),
        search_term_prefix: round.prefix().to_string(),
        outcome,
    }
}
