//! Match history: an append-only, newest-first, capped log of finished matches.

pub mod json_file;
pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod rocks;

use crate::{
    config::{StorageBackend, StorageConfig},
    errors::DuelResult,
    games::{
        scoring::format_duration,
        types::{FinalResult, PlayerSummary, PLAYER_COUNT},
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use json_file::JsonFileHistoryStore;
pub use memory::MemoryHistoryStore;
#[cfg(feature = "rocksdb")]
pub use rocks::RocksHistoryStore;

/// A finished match as persisted; never modified once written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Finish time in unix milliseconds, bumped when needed to stay unique within a store
    pub id: i64,
    #[serde(rename = "date")]
    pub iso_date: String,
    #[serde(rename = "dateFormatted")]
    pub display_date: String,
    pub players: [String; PLAYER_COUNT],
    /// Winner's name, or the tie label
    pub winner: String,
    #[serde(alias = "isRealTie")]
    pub is_exact_tie: bool,
    pub total_game_time: u64,
    pub total_game_time_formatted: String,
    pub players_summary: Vec<PlayerSummary>,
}

impl HistoryRecord {
    pub fn from_result(result: &FinalResult, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: recorded_at.timestamp_millis(),
            iso_date: recorded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            display_date: recorded_at
                .with_timezone(&Local)
                .format("%d/%m/%Y, %H:%M:%S")
                .to_string(),
            players: result.players.clone(),
            winner: result.winner.clone(),
            is_exact_tie: result.is_exact_tie,
            total_game_time: result.total_game_time,
            total_game_time_formatted: format_duration(result.total_game_time),
            players_summary: result.players_summary.clone(),
        }
    }
}

/// Persistence for finished matches
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Prepend a record and drop anything past the cap
    async fn append(&self, record: HistoryRecord) -> DuelResult<()>;

    /// All kept records, newest first; empty when nothing was stored yet
    async fn list(&self) -> DuelResult<Vec<HistoryRecord>>;

    async fn clear(&self) -> DuelResult<()>;

    /// Maximum number of records kept
    fn cap(&self) -> usize;
}

/// Newest-first insert that keeps at most `cap` records.
///
/// Ids stay strictly increasing towards the front: a record finished in the
/// same millisecond as the newest one (or behind it) takes the next id.
pub(crate) fn prepend_capped(records: &mut Vec<HistoryRecord>, mut record: HistoryRecord, cap: usize) {
    if let Some(newest) = records.first() {
        if record.id <= newest.id {
            record.id = newest.id + 1;
        }
    }
    records.insert(0, record);
    records.truncate(cap);
}

/// Build the store selected by configuration
pub fn create_history_store(config: &StorageConfig) -> DuelResult<Arc<dyn HistoryStore>> {
    let store: Arc<dyn HistoryStore> = match config.backend {
        StorageBackend::JsonFile => Arc::new(JsonFileHistoryStore::new(
            &config.history_path,
            config.history_cap,
        )),
        StorageBackend::Memory => Arc::new(MemoryHistoryStore::new(config.history_cap)),
        #[cfg(feature = "rocksdb")]
        StorageBackend::RocksDb => Arc::new(RocksHistoryStore::open(
            &config.rocksdb_path,
            config.history_cap,
        )?),
        #[cfg(not(feature = "rocksdb"))]
        StorageBackend::RocksDb => {
            return Err(crate::errors::ConfigurationError::ValidationFailed(
                "storage.backend = rocksdb requires building with the `rocksdb` feature"
                    .to_string(),
            )
            .into())
        }
    };

    Ok(store)
}
