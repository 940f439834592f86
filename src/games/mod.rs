//! Game rules: session state, turn flow, scoring.

pub mod clock;
pub mod engine;
pub mod scoring;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{GameEngine, GuessOutcome};
pub use scoring::{determine_winner, format_duration, TIE_LABEL};
pub use types::*;
