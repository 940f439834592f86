//! Match history in an embedded RocksDB database.
//!
//! The capped, newest-first array lives under a single key so the append
//! contract matches the file store exactly.

use super::{prepend_capped, HistoryRecord, HistoryStore};
use crate::errors::{DuelResult, StorageError};
use async_trait::async_trait;
use rocksdb::{Options, DB};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

const HISTORY_KEY: &[u8] = b"history:records";

pub struct RocksHistoryStore {
    db: Arc<DB>,
    cap: usize,
    lock: Mutex<()>,
}

impl RocksHistoryStore {
    pub fn open<P: AsRef<Path>>(path: P, cap: usize) -> DuelResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&opts, path.as_ref()).map_err(|e| {
            StorageError::Unavailable(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Ok(Self {
            db: Arc::new(db),
            cap,
            lock: Mutex::new(()),
        })
    }

    fn read_records(&self) -> DuelResult<Vec<HistoryRecord>> {
        let Some(bytes) = self
            .db
            .get(HISTORY_KEY)
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?
        else {
            return Ok(Vec::new());
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::CorruptedData(format!("Failed to decode history: {}", e)).into()
        })
    }

    fn write_records(&self, records: &[HistoryRecord]) -> DuelResult<()> {
        let bytes = serde_json::to_vec(records)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to encode history: {}", e)))?;
        self.db.put(HISTORY_KEY, bytes)?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for RocksHistoryStore {
    async fn append(&self, record: HistoryRecord) -> DuelResult<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records()?;
        prepend_capped(&mut records, record, self.cap);
        self.write_records(&records)
    }

    async fn list(&self) -> DuelResult<Vec<HistoryRecord>> {
        let _guard = self.lock.lock().await;
        self.read_records()
    }

    async fn clear(&self) -> DuelResult<()> {
        let _guard = self.lock.lock().await;
        self.write_records(&[])
    }

    fn cap(&self) -> usize {
        self.cap
    }
}
