//! Winner determination and time formatting.
//!
//! Comparisons always use raw milliseconds; the formatted strings are only
//! carried along for display.

use crate::games::types::{PlayerSummary, RoundAttempts, RoundRecord, Verdict, PLAYER_COUNT};
use std::cmp::Ordering;

/// Label stored as the winner when neither player is ahead
pub const TIE_LABEL: &str = "Tie";

/// Fewer attempts wins; equal attempts fall back to less time; equal on
/// both is an exact tie.
pub fn determine_winner(
    attempts: [u32; PLAYER_COUNT],
    times_ms: [u64; PLAYER_COUNT],
) -> Verdict {
    let by_attempts = attempts[0].cmp(&attempts[1]);
    let by_time = times_ms[0].cmp(&times_ms[1]);

    match by_attempts.then(by_time) {
        Ordering::Less => Verdict::Winner(0),
        Ordering::Greater => Verdict::Winner(1),
        Ordering::Equal => Verdict::ExactTie,
    }
}

/// `"{m}m {s}s"` from one minute up, `"{s}s"` below; sub-second remainders are dropped
pub fn format_duration(ms: u64) -> String {
    let seconds = ms / 1000;
    let minutes = seconds / 60;

    if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

/// Per-player totals plus the rounds each one played, in round order
pub fn summarize_players(
    players: &[String; PLAYER_COUNT],
    attempts: [u32; PLAYER_COUNT],
    times_ms: [u64; PLAYER_COUNT],
    rounds: &[RoundRecord],
) -> Vec<PlayerSummary> {
    (0..PLAYER_COUNT)
        .map(|i| PlayerSummary {
            name: players[i].clone(),
            total_attempts: attempts[i],
            total_time_ms: times_ms[i],
            total_time_formatted: format_duration(times_ms[i]),
            rounds_played: rounds
                .iter()
                .filter(|r| r.player_index == i)
                .map(|r| RoundAttempts {
                    round: r.round,
                    attempts: r.attempt_count,
                })
                .collect(),
        })
        .collect()
}
