use mn_core::Result;

use super::REGION;
use crate::patterns::{CompiledPatterns, SitePatterns};
use crate::scrapers::{Scraper, SourceMetadata};

/// Section entry pages: 头条 → 突发, 头条 → 新民社会, 头条 → 新民印象, 民生 → 城市生活.
pub const XINMIN_URLS: [&str; 4] = [
    "http://shanghai.xinmin.cn/tfbd/",
    "http://shanghai.xinmin.cn/xmsq/",
    "http://newsxmwb.xinmin.cn/xinminyx/pc/index.htm",
    "http://newsxmwb.xinmin.cn/chengsh/pc/index.htm",
];

#[derive(Debug, Clone)]
pub struct XinminScraper {
    patterns: CompiledPatterns,
    seeds: Vec<String>,
}

impl XinminScraper {
    pub fn new() -> Result<Self> {
        Self::with_patterns(&SitePatterns::default())
    }

    pub fn with_patterns(patterns: &SitePatterns) -> Result<Self> {
        Ok(Self {
            patterns: patterns.compile()?,
            seeds: XINMIN_URLS.iter().map(|url| url.to_string()).collect(),
        })
    }

    /// Replaces the built-in section list. An empty list keeps the defaults.
    pub fn with_seeds(mut self, seeds: Vec<String>) -> Self {
        if !seeds.is_empty() {
            self.seeds = seeds;
        }
        self
    }
}

impl Scraper for XinminScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "新民网",
            emoji: "🚇",
            region: REGION,
        }
    }

    fn can_handle(&self, url: &str) -> bool {
        url.contains("xinmin.cn")
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["xinmin"]
    }

    fn start_urls(&self) -> Vec<String> {
        self.seeds.clone()
    }

    fn patterns(&self) -> &CompiledPatterns {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_handle() {
        let scraper = XinminScraper::new().unwrap();
        assert!(scraper.can_handle("http://newsxmwb.xinmin.cn/chengsh/pc/index.htm"));
        assert!(!scraper.can_handle("https://www.clarin.com/article"));
    }

    #[test]
    fn test_seeds() {
        let scraper = XinminScraper::new().unwrap();
        assert_eq!(scraper.start_urls().len(), 4);

        let scraper = scraper.with_seeds(vec!["http://shanghai.xinmin.cn/tfbd/".to_string()]);
        assert_eq!(scraper.start_urls(), vec!["http://shanghai.xinmin.cn/tfbd/"]);

        let scraper = scraper.with_seeds(Vec::new());
        assert_eq!(scraper.start_urls().len(), 1);
    }
}
