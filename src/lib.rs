//! Guess Duel - two-player number guessing over HTTP
//!
//! Two players take turns guessing a secret number, one player per round.
//! Fewer total guesses wins, less total time breaks ties. Finished matches
//! are kept in a capped, newest-first history.

pub mod api;
pub mod config;
pub mod errors;
pub mod games;
pub mod history;
pub mod services;

pub use config::{ConfigLoader, DuelConfig};
pub use errors::{DuelError, DuelResult};
pub use games::{GameEngine, GuessOutcome};
pub use history::{HistoryRecord, HistoryStore};
pub use services::GameService;
