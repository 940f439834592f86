//! Match history must survive stopping and restarting the server

use guess_duel::{
    config::{DuelConfig, GameConfig, StorageBackend},
    games::{GameEngine, GuessOutcome, ManualClock},
    history::{create_history_store, HistoryStore, JsonFileHistoryStore},
    services::GameService,
};
use serde_json::Value;
use std::sync::Arc;

/// Play a one-round match by walking the hints, returning the finished outcome
async fn play_short_match(service: &GameService, p1: &str, p2: &str) -> GuessOutcome {
    service.start_game(p1, p2).await.unwrap();

    let (mut lo, mut hi) = (1i64, 100i64);
    loop {
        let mid = (lo + hi) / 2;
        let outcome = service.submit_guess(Some(&Value::from(mid))).await.unwrap();
        if outcome.game_complete() {
            return outcome;
        }
        match outcome.hint() {
            guess_duel::games::Hint::Higher => lo = mid + 1,
            guess_duel::games::Hint::Lower => hi = mid - 1,
            guess_duel::games::Hint::Correct => unreachable!("one-round match ends on the first correct guess"),
        }
    }
}

fn one_round_service(store: Arc<dyn HistoryStore>, seed: u64) -> GameService {
    let config = GameConfig {
        rounds: 1,
        seed: Some(seed),
        ..Default::default()
    };
    let engine = GameEngine::new(config, Arc::new(ManualClock::now_frozen()));
    GameService::new(engine, store)
}

#[tokio::test]
async fn test_history_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("game_history.json");

    // === PHASE 1: play two matches and shut down ===
    {
        let service = one_round_service(Arc::new(JsonFileHistoryStore::new(&path, 25)), 1);
        play_short_match(&service, "Ana", "Beto").await;
        play_short_match(&service, "Carla", "Dani").await;
    }

    assert!(path.exists(), "history file should be written");

    // === PHASE 2: a fresh store over the same file sees both, newest first ===
    let reopened = JsonFileHistoryStore::new(&path, 25);
    let records = reopened.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].players.contains(&"Carla".to_string()));
    assert!(records[1].players.contains(&"Ana".to_string()));

    // Appending after restart keeps the older entries
    let service = one_round_service(Arc::new(reopened), 2);
    play_short_match(&service, "Eva", "Fede").await;
    let records = service.history().await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(records[0].players.contains(&"Eva".to_string()));

    // The frozen clock finishes every match in the same millisecond
    assert!(records[0].id > records[1].id && records[1].id > records[2].id);
}

#[tokio::test]
async fn test_cap_applies_to_persisted_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut config = DuelConfig::default();
    config.storage.backend = StorageBackend::JsonFile;
    config.storage.history_path = path.to_string_lossy().to_string();
    config.storage.history_cap = 3;
    let store = create_history_store(&config.storage).unwrap();

    let service = one_round_service(store, 3);
    for i in 0..5 {
        play_short_match(&service, &format!("P{}", i), "Rival").await;
    }

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let entries = raw.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    let newest_players = entries[0]["players"].to_string();
    assert!(newest_players.contains("P4"));
    let oldest_players = entries[2]["players"].to_string();
    assert!(oldest_players.contains("P2"));
}
