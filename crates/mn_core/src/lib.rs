pub mod error;
pub mod storage;
pub mod types;

pub use error::Error;
pub use storage::RecordSink;
pub use types::{DetailFields, NewsRecord, SummaryRecord, DATETIME_FORMAT};

pub type Result<T> = std::result::Result<T, Error>;
