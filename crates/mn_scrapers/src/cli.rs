use clap::{Args, Subcommand};
use mn_core::Result;
use tracing::info;

use crate::manager::ScraperManager;
use crate::stats::CrawlStats;

#[derive(Args, Clone, Debug)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ScraperCommands {
    /// Crawl a source in format region/source (e.g. shanghai/xinmin). All sources if omitted.
    Source {
        source: Option<String>,
    },
    /// List available scrapers
    List,
    /// Crawl starting from a single section page
    Url {
        url: String,
    },
}

/// Runs one scraper command. Crawl commands return their stats.
pub async fn handle_command(args: ScraperArgs, manager: &ScraperManager) -> Result<Option<CrawlStats>> {
    match args.command {
        ScraperCommands::Source { source } => {
            let stats = manager.crawl_source(source.as_deref()).await?;
            info!("🦗 Crawl finished: {}", stats);
            Ok(Some(stats))
        }
        ScraperCommands::List => {
            let mut regions: Vec<_> = manager.list_scrapers()?.into_iter().collect();
            regions.sort();
            for (region, scrapers) in regions {
                println!("{}:", region);
                for scraper in scrapers {
                    println!("  - {}", scraper);
                }
            }
            Ok(None)
        }
        ScraperCommands::Url { url } => {
            let stats = manager.crawl_url(&url).await?;
            info!("🦗 Crawl finished: {}", stats);
            Ok(Some(stats))
        }
    }
}
