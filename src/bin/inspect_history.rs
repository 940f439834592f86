//! Print the persisted match history in a readable form.

use clap::Parser;
use guess_duel::{history::JsonFileHistoryStore, HistoryStore};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inspect-history")]
#[command(about = "Inspect the guess duel match history file", long_about = None)]
struct Args {
    /// History file written by the server
    #[arg(default_value = "./data/game_history.json")]
    path: PathBuf,

    /// Show at most this many matches
    #[arg(long, default_value = "10")]
    limit: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if !args.path.exists() {
        println!("❌ No history found at {:?}", args.path);
        return Ok(());
    }

    let store = JsonFileHistoryStore::new(&args.path, usize::MAX);
    let records = store.list().await?;

    println!("🔍 Match History Inspector");
    println!("==========================");
    println!("File: {}", args.path.display());
    println!("Stored matches: {}\n", records.len());

    for record in records.iter().take(args.limit) {
        println!("🎲 Match {} ({})", record.id, record.display_date);
        println!("   Players: {} vs {}", record.players[0], record.players[1]);
        if record.is_exact_tie {
            println!("   Result: exact tie");
        } else {
            println!("   Winner: {}", record.winner);
        }
        println!("   Duration: {}", record.total_game_time_formatted);

        for summary in &record.players_summary {
            let rounds: Vec<String> = summary
                .rounds_played
                .iter()
                .map(|r| format!("R{}={}", r.round, r.attempts))
                .collect();
            println!(
                "   - {}: {} attempts in {} [{}]",
                summary.name,
                summary.total_attempts,
                summary.total_time_formatted,
                rounds.join(", ")
            );
        }
        println!();
    }

    if records.len() > args.limit {
        println!("… {} older matches not shown", records.len() - args.limit);
    }

    Ok(())
}
