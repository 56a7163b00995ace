//! Local mirror of a round, for display only.
//!
//! The server is authoritative for score, strikes and reveals. The board
//! additionally remembers which positions *this player* guessed, so the game
//! over screen can tell earned answers from forced reveals and repeat guesses
//! can be called out without another request.

use autoguess_common::{GuessOutcome, GuessResponse, StartRoundResponse};

/// One answer slot as the player should see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tile {
    /// Still hidden
    Hidden,
    /// Guessed by the player
    Guessed(String),
    /// Revealed at game over without having been guessed
    Missed(String),
    /// Game over but the server did not send the text
    Unknown,
}

/// What to tell the player after a guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct { index: usize },
    AlreadyGuessed,
    Wrong { strikes: u32, maximum_strikes: u32 },
    GameOver,
}

#[derive(Debug, Clone)]
pub struct Board {
    pub round_identifier: String,
    pub prefix: String,
    pub answers: Vec<Option<String>>,
    pub guessed: Vec<bool>,
    pub score: u32,
    pub strikes: u32,
    pub maximum_strikes: u32,
    pub game_over: bool,
}

impl Board {
    pub fn from_start(start: StartRoundResponse) -> Self {
        let guessed = vec![false; start.masked_answers.len()];
        Self {
            round_identifier: start.round_identifier,
            prefix: start.search_term_prefix,
            answers: start.masked_answers,
            guessed,
            score: 0,
            strikes: 0,
            maximum_strikes: start.maximum_strikes,
            game_over: false,
        }
    }

    /// Prefix plus the typed suffix, or `None` if there is nothing to send.
    pub fn compose_guess(&self, suffix: &str) -> Option<String> {
        let full = format!("{}{}", self.prefix, suffix);
        if full.trim().is_empty() {
            None
        } else {
            Some(full)
        }
    }

    /// Fold a guess response into the mirror.
    pub fn apply_guess(&mut self, response: GuessResponse) -> Feedback {
        let mut repeated = response.outcome == GuessOutcome::Repeat;
        let hit_index = usize::try_from(response.correct_index)
            .ok()
            .filter(|&i| response.is_correct && i < response.revealed_answers.len());

        if let Some(index) = hit_index {
            if self.guessed.len() < response.revealed_answers.len() {
                self.guessed.resize(response.revealed_answers.len(), false);
            }
            if self.guessed[index] {
                repeated = true;
            } else {
                self.guessed[index] = true;
            }
        }

        self.score = response.score;
        self.strikes = response.strikes;
        self.answers = response.revealed_answers;
        self.game_over = response.game_over;

        if self.game_over || response.outcome == GuessOutcome::RoundOver {
            Feedback::GameOver
        } else if repeated {
            Feedback::AlreadyGuessed
        } else if let Some(index) = hit_index {
            Feedback::Correct { index }
        } else {
            Feedback::Wrong {
                strikes: self.strikes,
                maximum_strikes: self.maximum_strikes,
            }
        }
    }

    pub fn tiles(&self) -> Vec<Tile> {
        self.answers
            .iter()
            .enumerate()
            .map(|(index, answer)| {
                let guessed = self.guessed.get(index).copied().unwrap_or(false);
                match (answer, self.game_over) {
                    (None, false) => Tile::Hidden,
                    (None, true) => Tile::Unknown,
                    (Some(text), true) if !guessed => Tile::Missed(text.clone()),
                    (Some(text), _) => Tile::Guessed(text.clone()),
                }
            })
            .collect()
    }
}
