use async_trait::async_trait;
use mn_core::{NewsRecord, RecordSink, Result};
use tokio::sync::RwLock;

/// Keeps records in memory, replacing any earlier record with the same URL.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RwLock<Vec<NewsRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordSink for MemoryStorage {
    async fn store_record(&self, record: &NewsRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if let Some(existing) = records.iter_mut().find(|r| r.url == record.url) {
            *existing = record.clone();
        } else {
            records.push(record.clone());
        }
        Ok(())
    }

    async fn get_records(&self) -> Result<Vec<NewsRecord>> {
        Ok(self.records.read().await.clone())
    }
}
