use chrono::NaiveDateTime;
use mn_core::Result;
use scraper::Html;

use crate::config::CrawlConfig;
use crate::patterns::CompiledPatterns;
use crate::pipeline::{self, StageContext};
use crate::request::{Callback, FetchRequest, ParseOutput};

pub mod shanghai;
use shanghai::xinmin::XinminScraper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMetadata {
    pub name: &'static str,
    pub emoji: &'static str,
    pub region: Region,
}

pub trait Scraper: Send + Sync {
    /// Returns the metadata of the news source
    fn source_metadata(&self) -> SourceMetadata;

    /// Returns true if this scraper can handle the given URL
    fn can_handle(&self, url: &str) -> bool;

    /// Returns a list of CLI shorthand names for this scraper
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }

    /// Section entry pages the crawl starts from
    fn start_urls(&self) -> Vec<String>;

    /// Selectors and patterns for the site's current markup
    fn patterns(&self) -> &CompiledPatterns;

    fn start_requests(&self) -> Vec<FetchRequest> {
        self.start_urls()
            .into_iter()
            .map(|url| FetchRequest::new(url, Callback::Pagination))
            .collect()
    }

    /// Runs the stage `request` was routed to over the fetched document
    fn parse(
        &self,
        request: &FetchRequest,
        document: &Html,
        config: &CrawlConfig,
        now: NaiveDateTime,
    ) -> Result<ParseOutput> {
        let ctx = StageContext {
            patterns: self.patterns(),
            config,
            now,
        };
        pipeline::dispatch(request, document, &ctx)
    }
}

pub type BoxedScraper = Box<dyn Scraper>;
pub type ScraperFactory = Box<dyn Fn() -> Result<BoxedScraper> + Send + Sync>;

/// Every scraper shipped with the crate, with its default patterns and seeds.
pub fn get_scraper_factories() -> Vec<ScraperFactory> {
    vec![Box::new(|| Ok(Box::new(XinminScraper::new()?) as BoxedScraper))]
}
