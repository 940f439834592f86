//! In-process history; same contract as the file store, gone on restart.

use super::{prepend_capped, HistoryRecord, HistoryStore};
use crate::errors::DuelResult;
use async_trait::async_trait;
use tokio::sync::Mutex;

pub struct MemoryHistoryStore {
    records: Mutex<Vec<HistoryRecord>>,
    cap: usize,
}

impl MemoryHistoryStore {
    pub fn new(cap: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            cap,
        }
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, record: HistoryRecord) -> DuelResult<()> {
        let mut records = self.records.lock().await;
        prepend_capped(&mut records, record, self.cap);
        Ok(())
    }

    async fn list(&self) -> DuelResult<Vec<HistoryRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn clear(&self) -> DuelResult<()> {
        self.records.lock().await.clear();
        Ok(())
    }

    fn cap(&self) -> usize {
        self.cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::test_support::sample_record;

    #[tokio::test]
    async fn test_append_list_clear() {
        let store = MemoryHistoryStore::new(2);
        assert!(store.list().await.unwrap().is_empty());

        for id in 1..=3 {
            store.append(sample_record(id)).await.unwrap();
        }
        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);

        store.clear().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
