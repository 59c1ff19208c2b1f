use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mn_core::Result;
use mn_scrapers::cli::{handle_command, ScraperArgs, ScraperCommands as MnScraperCommands};
use mn_scrapers::config::{DEFAULT_CONCURRENCY, DEFAULT_LOOKBACK_DAYS, DEFAULT_MIN_PARAGRAPH_LEN};
use mn_scrapers::logging::init_logging;
use mn_scrapers::scrapers::shanghai::XinminScraper;
use mn_scrapers::scrapers::{BoxedScraper, ScraperFactory};
use mn_scrapers::{CrawlConfig, HttpFetcher, ScraperManager, SitePatterns};
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
struct HumanDuration(Duration);

/// Seconds per unit suffix of a duration term.
fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3600),
        'd' => Some(86_400),
        _ => None,
    }
}

/// Accepts terms like `1h 15m30s`. A trailing bare number counts as seconds.
impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        const TOO_LARGE: &str = "Duration is too large";

        let mut rest = s.trim();
        if rest.is_empty() {
            return Err("Duration must include a number".to_string());
        }

        let mut total: u64 = 0;
        while !rest.is_empty() {
            let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            if digits == 0 {
                return Err(format!("Expected a number at '{}'", rest));
            }
            let value: u64 = rest[..digits].parse().map_err(|_| TOO_LARGE.to_string())?;
            rest = &rest[digits..];

            let scale = match rest.chars().next() {
                None => 1,
                Some(unit) => {
                    rest = &rest[unit.len_utf8()..];
                    unit_seconds(unit).ok_or_else(|| format!("Invalid duration unit: {}", unit))?
                }
            };
            total = value
                .checked_mul(scale)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(|| TOO_LARGE.to_string())?;
            rest = rest.trim_start();
        }

        if total == 0 {
            return Err("Duration must be greater than zero".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Crawl Xinmin listing pages for metro news", long_about = None)]
struct Cli {
    /// Where records go: memory or jsonl
    #[arg(long, default_value = "jsonl")]
    storage: String,
    /// Output file for the jsonl storage
    #[arg(long, default_value = "records.jsonl")]
    output: String,
    /// Skip articles older than this many days
    #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS as u32)]
    lookback_days: u32,
    /// Body paragraphs shorter than this are dropped
    #[arg(long, default_value_t = DEFAULT_MIN_PARAGRAPH_LEN)]
    min_paragraph_len: usize,
    /// Concurrent fetches
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,
    /// Stop after this many fetches
    #[arg(long)]
    max_pages: Option<usize>,
    /// Abort on the first page whose markup does not parse
    #[arg(long)]
    fail_fast: bool,
    /// JSON file overriding selectors, labels and keywords
    #[arg(long)]
    patterns: Option<String>,
    /// Section entry pages to start from instead of the built-in list (repeatable)
    #[arg(long = "seed")]
    seeds: Vec<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    Scrape {
        #[command(subcommand)]
        command: Option<ScraperCommands>,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ScraperCommands {
    Source {
        /// The source to crawl in format region/source (e.g. shanghai/xinmin). If not specified, crawls all sources.
        #[arg(required = false)]
        source: Option<String>,
        /// Re-run the crawl periodically with the specified interval (e.g. 1h, 30m, 1h15m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    List,
    Url {
        url: String,
    },
}

impl Cli {
    fn crawl_config(&self) -> CrawlConfig {
        let mut config = CrawlConfig::default()
            .with_lookback_days(self.lookback_days)
            .with_min_paragraph_len(self.min_paragraph_len)
            .with_concurrency(self.concurrency);
        config.max_pages = self.max_pages;
        config.fail_fast = self.fail_fast;
        config
    }

    /// Custom patterns or seeds replace the default scraper registry.
    fn scraper_factories(&self) -> Result<Option<Vec<ScraperFactory>>> {
        if self.patterns.is_none() && self.seeds.is_empty() {
            return Ok(None);
        }
        let patterns = match &self.patterns {
            Some(path) => SitePatterns::from_json_file(path)?,
            None => SitePatterns::default(),
        };
        // Fail on bad selectors before any fetch happens
        patterns.compile()?;
        let seeds = self.seeds.clone();
        let factory: ScraperFactory = Box::new(move || {
            Ok(Box::new(XinminScraper::with_patterns(&patterns)?.with_seeds(seeds.clone())) as BoxedScraper)
        });
        Ok(Some(vec![factory]))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info");
    let cli = Cli::parse();

    let config = cli.crawl_config();
    let sink = mn_storage::create_storage(&cli.storage, Some(cli.output.as_str())).await?;
    info!("💾 Storage initialized (using {})", cli.storage);

    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let manager = match cli.scraper_factories()? {
        Some(factories) => ScraperManager::with_factories(sink, fetcher, config, factories),
        None => ScraperManager::new(sink, fetcher, config),
    };

    let names: Vec<&str> = manager
        .get_scrapers()?
        .iter()
        .map(|s| s.source_metadata().name)
        .collect();
    info!("🦗 Scrapers initialized: {}", names.join(", "));

    match cli.command {
        Commands::Scrape { command } => match command.unwrap_or(ScraperCommands::Source { source: None, interval: None }) {
            ScraperCommands::Source { source, interval } => {
                info!(
                    "🦗 Crawling {}",
                    source.as_deref().filter(|s| !s.is_empty()).unwrap_or("all sources")
                );
                let args = ScraperArgs {
                    command: MnScraperCommands::Source { source },
                };

                if let Some(interval) = interval {
                    info!("Running in periodic mode with {}s interval", interval.0.as_secs());
                    loop {
                        info!("Starting crawl cycle");
                        if let Err(e) = handle_command(args.clone(), &manager).await {
                            error!("Error during crawl: {}", e);
                        }
                        info!("Waiting {}s before next crawl", interval.0.as_secs());
                        tokio::time::sleep(interval.0).await;
                    }
                } else {
                    handle_command(args, &manager).await?;
                }
            }
            ScraperCommands::List => {
                let args = ScraperArgs {
                    command: MnScraperCommands::List,
                };
                handle_command(args, &manager).await?;
            }
            ScraperCommands::Url { url } => {
                info!("Crawling single section: {}", url);
                let args = ScraperArgs {
                    command: MnScraperCommands::Url { url },
                };
                handle_command(args, &manager).await?;
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        assert_eq!("1h".parse::<HumanDuration>().unwrap().0, Duration::from_secs(3600));
        assert_eq!("1h15m30s".parse::<HumanDuration>().unwrap().0, Duration::from_secs(4530));
        assert_eq!("90".parse::<HumanDuration>().unwrap().0, Duration::from_secs(90));
        assert!("1w".parse::<HumanDuration>().is_err());
        assert!("h".parse::<HumanDuration>().is_err());
        assert!("0s".parse::<HumanDuration>().is_err());
        assert_eq!("1h 30m".parse::<HumanDuration>().unwrap().0, Duration::from_secs(5400));
    }

    #[test]
    fn test_human_duration_overflow_is_an_error() {
        assert_eq!(
            "99999999999999999d".parse::<HumanDuration>(),
            Err("Duration is too large".to_string())
        );
        assert!("18446744073709551615s 1s".parse::<HumanDuration>().is_err());
        assert!("99999999999999999999999".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_cli_flags_reach_config() {
        let cli = Cli::parse_from([
            "metronews",
            "--lookback-days",
            "5",
            "--min-paragraph-len",
            "10",
            "--max-pages",
            "50",
            "--fail-fast",
            "scrape",
            "source",
            "shanghai/xinmin",
        ]);
        let config = cli.crawl_config();
        assert_eq!(config.lookback, mn_scrapers::config::CrawlConfig::default().with_lookback_days(5).lookback);
        assert_eq!(config.min_paragraph_len, 10);
        assert_eq!(config.max_pages, Some(50));
        assert!(config.fail_fast);
    }

    #[test]
    fn test_seeds_replace_registry() {
        let cli = Cli::parse_from([
            "metronews",
            "--seed",
            "http://shanghai.xinmin.cn/xmsq/",
            "scrape",
            "list",
        ]);
        let factories = cli.scraper_factories().unwrap().expect("custom factories");
        let scraper = factories[0]().unwrap();
        assert_eq!(scraper.start_urls(), vec!["http://shanghai.xinmin.cn/xmsq/"]);

        let cli = Cli::parse_from(["metronews", "scrape"]);
        assert!(cli.scraper_factories().unwrap().is_none());
    }
}
