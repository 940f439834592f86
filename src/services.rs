//! Service layer wiring the game engine to match history
//!
//! Handlers only talk to [`GameService`]; it serialises access to the
//! engine and hands finished matches to the history store.

use crate::{
    config::DuelConfig,
    errors::{DuelResult, GameError},
    games::{Clock, GameEngine, GuessOutcome, SessionView, SystemClock},
    history::{create_history_store, HistoryRecord, HistoryStore},
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub struct GameService {
    engine: Mutex<GameEngine>,
    history: Arc<dyn HistoryStore>,
}

impl GameService {
    pub fn new(engine: GameEngine, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            engine: Mutex::new(engine),
            history,
        }
    }

    /// Build the engine and the configured history backend
    pub fn from_config(config: &DuelConfig) -> DuelResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &DuelConfig, clock: Arc<dyn Clock>) -> DuelResult<Self> {
        let history = create_history_store(&config.storage)?;
        info!(
            backend = ?config.storage.backend,
            cap = history.cap(),
            rounds = config.game.rounds,
            "Game service ready"
        );
        Ok(Self::new(GameEngine::new(config.game.clone(), clock), history))
    }

    pub async fn start_game(&self, player1: &str, player2: &str) -> Result<SessionView, GameError> {
        self.engine.lock().await.start_game(player1, player2)
    }

    /// Evaluate a guess; a finished match is persisted on a best-effort basis
    pub async fn submit_guess(&self, raw: Option<&Value>) -> Result<GuessOutcome, GameError> {
        let outcome = self.engine.lock().await.submit_guess(raw)?;

        if let GuessOutcome::Finished { record, .. } = &outcome {
            if let Err(e) = self.history.append(record.clone()).await {
                warn!(
                    error = %e,
                    record_id = record.id,
                    "Failed to persist finished match, returning result anyway"
                );
            }
        }

        Ok(outcome)
    }

    pub async fn status(&self) -> Option<SessionView> {
        self.engine.lock().await.status()
    }

    pub async fn reset(&self) -> bool {
        self.engine.lock().await.reset()
    }

    pub async fn history(&self) -> DuelResult<Vec<HistoryRecord>> {
        self.history.list().await
    }

    pub async fn clear_history(&self) -> DuelResult<()> {
        self.history.clear().await
    }

    pub fn history_store(&self) -> Arc<dyn HistoryStore> {
        Arc::clone(&self.history)
    }
}
