pub mod cli;
pub mod config;
pub mod fetcher;
pub mod logging;
pub mod manager;
pub mod patterns;
pub mod pipeline;
pub mod request;
pub mod scrapers;
pub mod stats;

pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use config::CrawlConfig;
pub use fetcher::{Fetcher, HttpFetcher};
pub use manager::ScraperManager;
pub use patterns::{CompiledPatterns, SitePatterns};
pub use request::{Callback, FetchRequest, ParseOutput};
pub use scrapers::Scraper;
pub use stats::CrawlStats;

pub mod prelude {
    pub use super::scrapers::Scraper;
    pub use super::{Callback, CrawlConfig, FetchRequest, ParseOutput};
    pub use mn_core::{Error, NewsRecord, Result};
}
