use async_trait::async_trait;
use crate::types::NewsRecord;
use crate::Result;

#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Store a completed record
    async fn store_record(&self, record: &NewsRecord) -> Result<()>;

    /// Get every record stored so far
    async fn get_records(&self) -> Result<Vec<NewsRecord>>;

    /// Get all records whose breadcrumb tags contain `tag`
    async fn get_by_source_tag(&self, tag: &str) -> Result<Vec<NewsRecord>> {
        Ok(self
            .get_records()
            .await?
            .into_iter()
            .filter(|r| r.source_tags.as_deref().is_some_and(|t| t.contains(tag)))
            .collect())
    }
}
