use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use mn_core::{Error, RecordSink, Result};
use scraper::Html;
use tracing::{debug, error, info, warn};

use crate::config::CrawlConfig;
use crate::fetcher::Fetcher;
use crate::request::{Callback, FetchRequest, ParseOutput};
use crate::scrapers::{get_scraper_factories, BoxedScraper, Scraper, ScraperFactory};
use crate::stats::CrawlStats;

/// Drives scrapers: owns the frontier, the fetcher and the record sink.
pub struct ScraperManager {
    sink: Arc<dyn RecordSink>,
    fetcher: Arc<dyn Fetcher>,
    factories: Vec<ScraperFactory>,
    config: CrawlConfig,
}

/// Per-crawl frontier with a fingerprint dupe filter.
struct Frontier {
    queue: VecDeque<FetchRequest>,
    seen: HashSet<String>,
}

impl Frontier {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Returns false when the request was already scheduled during this crawl.
    fn push(&mut self, request: FetchRequest) -> bool {
        if !self.seen.insert(request.fingerprint()) {
            return false;
        }
        self.queue.push_back(request);
        true
    }
}

impl ScraperManager {
    pub fn new(sink: Arc<dyn RecordSink>, fetcher: Arc<dyn Fetcher>, config: CrawlConfig) -> Self {
        Self::with_factories(sink, fetcher, config, get_scraper_factories())
    }

    pub fn with_factories(
        sink: Arc<dyn RecordSink>,
        fetcher: Arc<dyn Fetcher>,
        config: CrawlConfig,
        factories: Vec<ScraperFactory>,
    ) -> Self {
        Self {
            sink,
            fetcher,
            factories,
            config,
        }
    }

    pub fn add_scraper_factory(&mut self, factory: ScraperFactory) {
        self.factories.push(factory);
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn get_scrapers(&self) -> Result<Vec<BoxedScraper>> {
        self.factories.iter().map(|f| f()).collect()
    }

    pub fn get_scraper_for_url(&self, url: &str) -> Result<BoxedScraper> {
        for factory in &self.factories {
            let scraper = factory()?;
            if scraper.can_handle(url) {
                return Ok(scraper);
            }
        }
        Err(Error::Scraping(format!("No scraper found for URL: {}", url)))
    }

    /// `source` is `region` or `region/name`, e.g. `shanghai/xinmin`.
    pub fn get_scrapers_for_source(&self, source: &str) -> Result<Vec<BoxedScraper>> {
        let (region, name) = parse_source(source)?;
        let mut result = Vec::new();
        for scraper in self.get_scrapers()? {
            if scraper.source_metadata().region.name != region {
                continue;
            }
            let wanted = match name {
                Some(name) => scraper.cli_names().contains(&name),
                None => true,
            };
            if wanted {
                result.push(scraper);
            }
        }
        if result.is_empty() {
            return Err(Error::Scraping(format!("No scraper found for {}", source)));
        }
        Ok(result)
    }

    /// Region name → `region/name` of every registered scraper.
    pub fn list_scrapers(&self) -> Result<HashMap<String, Vec<String>>> {
        let mut listing: HashMap<String, Vec<String>> = HashMap::new();
        for scraper in self.get_scrapers()? {
            let meta = scraper.source_metadata();
            let entry = listing.entry(meta.region.name.to_string()).or_default();
            for name in scraper.cli_names() {
                entry.push(format!("{}/{} {} {}", meta.region.name, name, meta.emoji, meta.name));
            }
        }
        Ok(listing)
    }

    /// Crawls one source, or every registered source when `source` is `None`.
    pub async fn crawl_source(&self, source: Option<&str>) -> Result<CrawlStats> {
        let scrapers = match source.filter(|s| !s.is_empty()) {
            Some(source) => self.get_scrapers_for_source(source)?,
            None => self.get_scrapers()?,
        };

        let mut total = CrawlStats::default();
        for scraper in scrapers {
            let seeds = scraper.start_requests();
            total += self.crawl(scraper.as_ref(), seeds).await?;
        }
        Ok(total)
    }

    /// Crawls starting from a single section page.
    pub async fn crawl_url(&self, url: &str) -> Result<CrawlStats> {
        let scraper = self.get_scraper_for_url(url)?;
        self.crawl(scraper.as_ref(), vec![FetchRequest::new(url, Callback::Pagination)])
            .await
    }

    /// Breadth-first crawl: each wave is fetched concurrently, then every
    /// response is parsed and its follow-up requests form the next wave.
    pub async fn crawl(&self, scraper: &dyn Scraper, seeds: Vec<FetchRequest>) -> Result<CrawlStats> {
        let meta = scraper.source_metadata();
        let now = scraper.patterns().site_now(Utc::now());
        let mut stats = CrawlStats::default();
        let mut frontier = Frontier::new();
        for seed in seeds {
            if !frontier.push(seed) {
                stats.duplicates_dropped += 1;
            }
        }
        info!("{} Crawling {} from {} seed(s)", meta.emoji, meta.name, frontier.queue.len());

        while !frontier.queue.is_empty() {
            let mut wave: Vec<FetchRequest> = frontier.queue.drain(..).collect();
            if let Some(max_pages) = self.config.max_pages {
                let remaining = max_pages.saturating_sub(stats.fetch_attempts());
                if remaining == 0 {
                    warn!(max_pages, pending = wave.len(), "Page limit reached, stopping crawl");
                    break;
                }
                wave.truncate(remaining);
            }

            let fetcher = &self.fetcher;
            let responses: Vec<(FetchRequest, Result<String>)> = stream::iter(wave)
                .map(|request| async move {
                    let body = fetcher.fetch(&request.url).await;
                    (request, body)
                })
                .buffer_unordered(self.config.concurrency.max(1))
                .collect()
                .await;

            for (request, body) in responses {
                let body = match body {
                    Ok(body) => {
                        stats.pages_fetched += 1;
                        body
                    }
                    Err(e) => {
                        error!(url = %request.url, stage = request.callback.name(), error = %e, "Fetch failed");
                        stats.fetch_failures += 1;
                        continue;
                    }
                };

                let parsed = {
                    let document = Html::parse_document(&body);
                    scraper.parse(&request, &document, &self.config, now)
                };
                let mut output = match parsed {
                    Ok(output) => output,
                    Err(e) => ParseOutput::new().fail(e),
                };

                stats.stale_skipped += output.stale;
                if output.filtered_out {
                    stats.filtered_out += 1;
                }
                for next in output.requests.drain(..) {
                    if !frontier.push(next) {
                        stats.duplicates_dropped += 1;
                    }
                }
                if let Some(record) = output.record.take() {
                    self.sink.store_record(&record).await?;
                    stats.records_emitted += 1;
                    info!("📰 {} [{}] {}", record.datetime, record.source_tags.as_deref().unwrap_or("-"), record.title);
                }
                if let Some(e) = output.error {
                    if self.config.fail_fast {
                        return Err(e);
                    }
                    error!(
                        url = %request.url,
                        stage = request.callback.name(),
                        markup_drift = e.is_markup_drift(),
                        error = %e,
                        "Page failed to parse"
                    );
                    stats.pages_failed += 1;
                }
            }
            debug!(pending = frontier.queue.len(), "Wave complete");
        }

        info!("✅ {} done: {}", meta.name, stats);
        Ok(stats)
    }
}

fn parse_source(source: &str) -> Result<(&str, Option<&str>)> {
    let parts: Vec<&str> = source.split('/').collect();
    match parts.as_slice() {
        [region] => Ok((*region, None)),
        [region, name] => Ok((*region, Some(*name))),
        _ => Err(Error::Scraping(format!("Invalid source format: {}", source))),
    }
}
