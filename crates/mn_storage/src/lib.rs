use std::sync::Arc;

use mn_core::{Error, RecordSink, Result};

pub mod backends;

pub use backends::jsonl::JsonLinesStorage;
pub use backends::memory::MemoryStorage;

/// Builds the sink named on the command line: `memory` or `jsonl`.
pub async fn create_storage(kind: &str, path: Option<&str>) -> Result<Arc<dyn RecordSink>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        "jsonl" => {
            let path = path.ok_or_else(|| {
                Error::Config("jsonl storage needs an output path".to_string())
            })?;
            Ok(Arc::new(JsonLinesStorage::open(path).await?))
        }
        other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::create_storage;
}
