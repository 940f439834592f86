//! Match history kept as one pretty-printed JSON array on disk.
//!
//! Every append rewrites the whole file through a sibling temp file and a
//! rename, so readers see either the old or the new array.

use super::{prepend_capped, HistoryRecord, HistoryStore};
use crate::errors::{DuelResult, StorageError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub struct JsonFileHistoryStore {
    path: PathBuf,
    cap: usize,
    // Serialises read-modify-write cycles
    lock: Mutex<()>,
}

impl JsonFileHistoryStore {
    pub fn new<P: AsRef<Path>>(path: P, cap: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cap,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> DuelResult<Vec<HistoryRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                ))
                .into())
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            StorageError::CorruptedData(format!("{}: {}", self.path.display(), e)).into()
        })
    }

    async fn write_records(&self, records: &[HistoryRecord]) -> DuelResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::WriteFailed(format!("creating {}: {}", parent.display(), e))
            })?;
        }

        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| StorageError::WriteFailed(format!("encoding history: {}", e)))?;

        let tmp_path = self.temp_path();
        tokio::fs::write(&tmp_path, &bytes).await.map_err(|e| {
            StorageError::WriteFailed(format!("{}: {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            StorageError::WriteFailed(format!("{}: {}", self.path.display(), e))
        })?;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "history.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn append(&self, record: HistoryRecord) -> DuelResult<()> {
        let _guard = self.lock.lock().await;

        // A corrupt file fails here instead of being overwritten
        let mut records = self.read_records().await?;
        let id = record.id;
        prepend_capped(&mut records, record, self.cap);
        self.write_records(&records).await?;

        tracing::debug!(
            record_id = id,
            kept = records.len(),
            path = %self.path.display(),
            "Match appended to history file"
        );
        Ok(())
    }

    async fn list(&self) -> DuelResult<Vec<HistoryRecord>> {
        let _guard = self.lock.lock().await;
        self.read_records().await
    }

    async fn clear(&self) -> DuelResult<()> {
        let _guard = self.lock.lock().await;
        self.write_records(&[]).await?;
        tracing::info!(path = %self.path.display(), "History file cleared");
        Ok(())
    }

    fn cap(&self) -> usize {
        self.cap
    }
}
