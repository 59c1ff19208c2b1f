use std::fmt;
use std::ops::AddAssign;

/// Counters for one crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    /// Pages whose parse failed (stale selectors).
    pub pages_failed: usize,
    pub duplicates_dropped: usize,
    pub stale_skipped: usize,
    pub filtered_out: usize,
    pub records_emitted: usize,
}

impl CrawlStats {
    pub fn fetch_attempts(&self) -> usize {
        self.pages_fetched + self.fetch_failures
    }
}

impl AddAssign for CrawlStats {
    fn add_assign(&mut self, other: Self) {
        self.pages_fetched += other.pages_fetched;
        self.fetch_failures += other.fetch_failures;
        self.pages_failed += other.pages_failed;
        self.duplicates_dropped += other.duplicates_dropped;
        self.stale_skipped += other.stale_skipped;
        self.filtered_out += other.filtered_out;
        self.records_emitted += other.records_emitted;
    }
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages fetched ({} failed to fetch, {} failed to parse), {} stale, {} filtered, {} records",
            self.pages_fetched,
            self.fetch_failures,
            self.pages_failed,
            self.stale_skipped,
            self.filtered_out,
            self.records_emitted
        )
    }
}
