use std::time::Duration;

pub const DEFAULT_LOOKBACK_DAYS: i64 = 2;
pub const DEFAULT_MIN_PARAGRAPH_LEN: usize = 30;
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_USER_AGENT: &str = concat!("metronews/", env!("CARGO_PKG_VERSION"));

/// Knobs for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Articles older than `now - lookback` are not followed to their detail page.
    pub lookback: chrono::Duration,
    /// Paragraphs shorter than this (in characters, after trimming) are dropped.
    pub min_paragraph_len: usize,
    /// Fetches in flight at once.
    pub concurrency: usize,
    /// Stop after this many fetch attempts.
    pub max_pages: Option<usize>,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Abort the whole crawl on the first page that fails to parse.
    pub fail_fast: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            lookback: chrono::Duration::days(DEFAULT_LOOKBACK_DAYS),
            min_paragraph_len: DEFAULT_MIN_PARAGRAPH_LEN,
            concurrency: DEFAULT_CONCURRENCY,
            max_pages: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            fail_fast: false,
        }
    }
}

impl CrawlConfig {
    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback = chrono::Duration::days(i64::from(days));
        self
    }

    pub fn with_min_paragraph_len(mut self, len: usize) -> Self {
        self.min_paragraph_len = len;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}
