use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of seats at the table
pub const PLAYER_COUNT: usize = 2;

/// Session lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Playing,
    Finished,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Playing => write!(f, "playing"),
            SessionStatus::Finished => write!(f, "finished"),
        }
    }
}

/// Feedback for one guess, relative to the secret
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Hint {
    Correct,
    /// The secret is greater than the guess
    Higher,
    /// The secret is smaller than the guess
    Lower,
}

impl Hint {
    pub fn classify(guess: u32, secret: u32) -> Self {
        match guess.cmp(&secret) {
            std::cmp::Ordering::Equal => Hint::Correct,
            std::cmp::Ordering::Less => Hint::Higher,
            std::cmp::Ordering::Greater => Hint::Lower,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Hint::Correct => "Correct! 🎉",
            Hint::Higher => "The number is higher 📈",
            Hint::Lower => "The number is lower 📉",
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// One guess in the round in progress
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attempt {
    pub number: u32,
    pub player: String,
}

/// A finished round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub round: u32,
    pub player_index: usize,
    pub player_name: String,
    pub attempt_count: u32,
    pub elapsed_ms: u64,
}

/// The single live match
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) players: [String; PLAYER_COUNT],
    pub(crate) round: u32,
    pub(crate) active_player: usize,
    pub(crate) secret_number: u32,
    pub(crate) current_attempts: Vec<Attempt>,
    pub(crate) total_attempts: [u32; PLAYER_COUNT],
    pub(crate) total_time_ms: [u64; PLAYER_COUNT],
    pub(crate) round_started_at: DateTime<Utc>,
    pub(crate) game_started_at: DateTime<Utc>,
    pub(crate) round_history: Vec<RoundRecord>,
    pub(crate) status: SessionStatus,
}

impl Session {
    pub fn players(&self) -> &[String; PLAYER_COUNT] {
        &self.players
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn active_player(&self) -> usize {
        self.active_player
    }

    pub fn active_player_name(&self) -> &str {
        &self.players[self.active_player]
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_attempts(&self) -> &[Attempt] {
        &self.current_attempts
    }

    pub fn total_attempts(&self) -> [u32; PLAYER_COUNT] {
        self.total_attempts
    }

    pub fn total_time_ms(&self) -> [u64; PLAYER_COUNT] {
        self.total_time_ms
    }

    pub fn round_history(&self) -> &[RoundRecord] {
        &self.round_history
    }

    /// Snapshot returned after start and after each non-terminal guess
    pub fn view(&self) -> SessionView {
        SessionView {
            players: self.players.clone(),
            current_round: self.round,
            active_player: self.active_player,
            active_player_name: self.active_player_name().to_string(),
            status: self.status,
            attempts: self.current_attempts.clone(),
            current_scores: self.total_attempts,
            current_times: None,
            current_round_time: None,
            current_round_time_formatted: None,
            game_history: None,
        }
    }
}

/// Client-facing snapshot of the session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub players: [String; PLAYER_COUNT],
    pub current_round: u32,
    pub active_player: usize,
    pub active_player_name: String,
    pub status: SessionStatus,
    pub attempts: Vec<Attempt>,
    pub current_scores: [u32; PLAYER_COUNT],
    // Status queries only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current_times: Option<[u64; PLAYER_COUNT]>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current_round_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current_round_time_formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub game_history: Option<Vec<RoundRecord>>,
}

/// Attempts a player needed in one of their rounds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundAttempts {
    pub round: u32,
    pub attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub name: String,
    pub total_attempts: u32,
    #[serde(default)]
    pub total_time_ms: u64,
    pub total_time_formatted: String,
    pub rounds_played: Vec<RoundAttempts>,
}

/// Outcome of the winner comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Winner(usize),
    ExactTie,
}

/// Everything known about a match once its last round is won
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FinalResult {
    pub status: SessionStatus,
    pub players: [String; PLAYER_COUNT],
    /// Winner's name, or the tie label
    pub winner: String,
    pub is_exact_tie: bool,
    pub players_summary: Vec<PlayerSummary>,
    pub final_scores: [u32; PLAYER_COUNT],
    pub total_game_time: u64,
    pub total_game_time_formatted: String,
}
