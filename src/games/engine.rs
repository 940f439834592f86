//! Round/turn state machine for the single live match.
//!
//! The engine owns at most one [`Session`]. Starting a game replaces it,
//! winning the last round consumes it.

use crate::{
    config::GameConfig,
    errors::GameError,
    games::{
        clock::{elapsed_ms, Clock},
        scoring::{determine_winner, format_duration, summarize_players, TIE_LABEL},
        types::{Attempt, FinalResult, Hint, RoundRecord, Session, SessionStatus, SessionView, Verdict},
    },
    history::HistoryRecord,
};
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// What a successful guess led to
#[derive(Debug, Clone)]
pub enum GuessOutcome {
    /// The match goes on; `round_complete` is set when this guess won a round
    InProgress {
        hint: Hint,
        round_complete: bool,
        view: SessionView,
    },
    /// The last round was won; the session is gone
    Finished {
        hint: Hint,
        result: FinalResult,
        record: HistoryRecord,
    },
}

impl GuessOutcome {
    pub fn hint(&self) -> Hint {
        match self {
            GuessOutcome::InProgress { hint, .. } | GuessOutcome::Finished { hint, .. } => *hint,
        }
    }

    pub fn round_complete(&self) -> bool {
        match self {
            GuessOutcome::InProgress { round_complete, .. } => *round_complete,
            GuessOutcome::Finished { .. } => true,
        }
    }

    pub fn game_complete(&self) -> bool {
        matches!(self, GuessOutcome::Finished { .. })
    }
}

pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    clock: Arc<dyn Clock>,
    session: Option<Session>,
}

impl GameEngine {
    /// Create an engine; `config.seed` fixes the random sequence when set
    pub fn new(config: GameConfig, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            rng,
            clock,
            session: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Start a match, discarding any unfinished one
    pub fn start_game(&mut self, player1: &str, player2: &str) -> Result<SessionView, GameError> {
        let (player1, player2) = (player1.trim(), player2.trim());
        if player1.is_empty() || player2.is_empty() {
            return Err(GameError::MissingPlayerName);
        }

        let mut players = [player1.to_string(), player2.to_string()];
        if self.rng.gen_bool(0.5) {
            players.swap(0, 1);
        }

        if let Some(previous) = &self.session {
            info!(
                players = ?previous.players,
                round = previous.round,
                "Discarding unfinished game"
            );
        }

        let now = self.clock.now();
        let session = Session {
            players,
            round: 1,
            active_player: 0,
            secret_number: self.draw_secret(),
            current_attempts: Vec::new(),
            total_attempts: [0, 0],
            total_time_ms: [0, 0],
            round_started_at: now,
            game_started_at: now,
            round_history: Vec::new(),
            status: SessionStatus::Playing,
        };

        info!(
            players = ?session.players,
            starts = %session.active_player_name(),
            rounds = self.config.rounds,
            "New game started"
        );
        debug!(secret = session.secret_number, "Secret number drawn");

        let view = session.view();
        self.session = Some(session);
        Ok(view)
    }

    /// Evaluate a guess for the active player.
    ///
    /// Accepts a JSON integer or a string holding one. Rejected guesses are
    /// not recorded.
    pub fn submit_guess(&mut self, raw: Option<&Value>) -> Result<GuessOutcome, GameError> {
        let (min, max) = (self.config.min_secret, self.config.max_secret);

        let session = self.session.as_mut().ok_or(GameError::NoActiveGame)?;
        // Finishing consumes the session, so this only fires if a finished
        // session is ever kept around
        if session.status != SessionStatus::Playing {
            return Err(GameError::NotPlaying);
        }

        let value = parse_guess(raw, min, max)?;
        let player = session.active_player_name().to_string();
        session.current_attempts.push(Attempt {
            number: value,
            player: player.clone(),
        });

        let hint = Hint::classify(value, session.secret_number);
        debug!(
            player = %player,
            guess = value,
            round = session.round,
            hint = ?hint,
            "Guess evaluated"
        );

        if hint != Hint::Correct {
            return Ok(GuessOutcome::InProgress {
                hint,
                round_complete: false,
                view: session.view(),
            });
        }

        let now = self.clock.now();
        close_round(session, now);

        if session.round < self.config.rounds {
            session.round += 1;
            session.active_player = 1 - session.active_player;
            session.secret_number = self.rng.gen_range(min..=max);
            session.round_started_at = now;

            info!(
                round = session.round,
                player = %session.active_player_name(),
                "Next round"
            );
            debug!(secret = session.secret_number, "Secret number drawn");

            return Ok(GuessOutcome::InProgress {
                hint,
                round_complete: true,
                view: session.view(),
            });
        }

        session.status = SessionStatus::Finished;
        let Some(finished) = self.session.take() else {
            return Err(GameError::NoActiveGame);
        };

        let result = finalize(&finished, now);
        info!(
            winner = %result.winner,
            exact_tie = result.is_exact_tie,
            scores = ?result.final_scores,
            "Game finished"
        );

        Ok(GuessOutcome::Finished {
            hint,
            record: HistoryRecord::from_result(&result, now),
            result,
        })
    }

    /// Convenience wrapper around [`submit_guess`](Self::submit_guess) for numeric input
    pub fn guess_number(&mut self, value: i64) -> Result<GuessOutcome, GameError> {
        self.submit_guess(Some(&Value::from(value)))
    }

    /// Current session with live timers and the rounds played so far
    pub fn status(&self) -> Option<SessionView> {
        let session = self.session.as_ref()?;
        let round_time = elapsed_ms(session.round_started_at, self.clock.now());

        let mut view = session.view();
        view.current_times = Some(session.total_time_ms);
        view.current_round_time = Some(round_time);
        view.current_round_time_formatted = Some(format_duration(round_time));
        view.game_history = Some(session.round_history.clone());
        Some(view)
    }

    /// Drop the current session if any; returns whether one existed
    pub fn reset(&mut self) -> bool {
        let existed = self.session.take().is_some();
        if existed {
            info!("Game reset");
        }
        existed
    }

    fn draw_secret(&mut self) -> u32 {
        self.rng
            .gen_range(self.config.min_secret..=self.config.max_secret)
    }
}

/// Credit the finished round to the active player and clear its attempts
fn close_round(session: &mut Session, now: DateTime<Utc>) {
    let elapsed = elapsed_ms(session.round_started_at, now);
    let index = session.active_player;
    let attempt_count = session.current_attempts.len() as u32;

    session.total_attempts[index] += attempt_count;
    session.total_time_ms[index] += elapsed;
    session.round_history.push(RoundRecord {
        round: session.round,
        player_index: index,
        player_name: session.players[index].clone(),
        attempt_count,
        elapsed_ms: elapsed,
    });
    session.current_attempts.clear();

    info!(
        round = session.round,
        player = %session.players[index],
        attempts = attempt_count,
        elapsed_ms = elapsed,
        "Round won"
    );
}

fn finalize(session: &Session, now: DateTime<Utc>) -> FinalResult {
    let (winner, is_exact_tie) = match determine_winner(session.total_attempts, session.total_time_ms) {
        Verdict::Winner(index) => (session.players[index].clone(), false),
        Verdict::ExactTie => (TIE_LABEL.to_string(), true),
    };
    let total_game_time = elapsed_ms(session.game_started_at, now);

    FinalResult {
        status: SessionStatus::Finished,
        players: session.players.clone(),
        winner,
        is_exact_tie,
        players_summary: summarize_players(
            &session.players,
            session.total_attempts,
            session.total_time_ms,
            &session.round_history,
        ),
        final_scores: session.total_attempts,
        total_game_time,
        total_game_time_formatted: format_duration(total_game_time),
    }
}

/// Integer in `[min, max]` from a JSON number or numeric string
pub fn parse_guess(raw: Option<&Value>, min: u32, max: u32) -> Result<u32, GameError> {
    let invalid = |raw: String| GameError::InvalidGuess { raw, min, max };

    let value = match raw {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| invalid(n.to_string()))?,
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid(s.clone()))?,
        Some(other) => return Err(invalid(other.to_string())),
        None => return Err(invalid(String::new())),
    };

    if value < i64::from(min) || value > i64::from(max) {
        return Err(invalid(value.to_string()));
    }

    Ok(value as u32)
}
