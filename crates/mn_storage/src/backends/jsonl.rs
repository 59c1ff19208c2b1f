use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mn_core::{Error, NewsRecord, RecordSink, Result};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

/// Appends one JSON object per line to a file.
#[derive(Debug)]
pub struct JsonLinesStorage {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesStorage {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path).await?;
        info!(path = %path.display(), "💾 Writing records as JSON lines");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for JsonLinesStorage {
    async fn store_record(&self, record: &NewsRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn get_records(&self) -> Result<Vec<NewsRecord>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| {
                    Error::Storage(format!("{} line {}: {}", self.path.display(), i + 1, e))
                })
            })
            .collect()
    }
}
