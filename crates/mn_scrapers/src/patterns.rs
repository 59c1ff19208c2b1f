//! Selectors and text patterns for one version of a site's markup.
//!
//! `SitePatterns` is plain data (and can be loaded from JSON), so a markup
//! change on the site means editing a file, not the extraction code.
//! `CompiledPatterns` is what the pipeline stages actually run against.

use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use mn_core::{Error, Result};
use regex::{Regex, RegexBuilder};
use scraper::Selector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitePatterns {
    /// Anchors inside the pagination control of a listing page.
    pub pagination_link: String,
    /// One element per article on a listing page.
    pub listing_block: String,
    pub summary_image: String,
    pub summary_title: String,
    pub summary_body: String,
    /// Label/value spans of a listing block. The timestamp is the last one.
    pub summary_timestamp: String,
    pub detail_link: String,
    pub breadcrumb: String,
    pub breadcrumb_prefix: String,
    pub article_body: String,
    /// Relative to `article_body`.
    pub attribution: String,
    /// Relative to `article_body`.
    pub paragraph: String,
    /// Relative to `paragraph`.
    pub paragraph_image: String,
    pub source_label: String,
    pub journalist_label: String,
    pub editor_label: String,
    pub timestamp: String,
    /// Case-insensitive. An empty list lets every article through.
    pub keywords: Vec<String>,
    /// Offset of the wall clock the site prints its timestamps in.
    pub utc_offset_seconds: i32,
}

impl Default for SitePatterns {
    fn default() -> Self {
        Self {
            pagination_link: "div.fenye div.pageBox a".to_string(),
            listing_block: "div.main ul.list > li".to_string(),
            summary_image: "img".to_string(),
            summary_title: "h3 a".to_string(),
            summary_body: "p.zhaiyao".to_string(),
            summary_timestamp: "div.info span".to_string(),
            detail_link: "h3 a".to_string(),
            breadcrumb: "div.position".to_string(),
            breadcrumb_prefix: "您现在的位置：首页 >".to_string(),
            article_body: "div.a_content".to_string(),
            attribution: "span".to_string(),
            paragraph: "p".to_string(),
            paragraph_image: "img".to_string(),
            source_label: "来源".to_string(),
            journalist_label: "记者".to_string(),
            editor_label: "编辑".to_string(),
            timestamp: r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}".to_string(),
            keywords: vec!["metro".to_string(), "subway".to_string(), "地铁".to_string()],
            utc_offset_seconds: 8 * 3600,
        }
    }
}

impl SitePatterns {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!("Invalid patterns file {}: {}", path.display(), e))
        })
    }

    pub fn compile(&self) -> Result<CompiledPatterns> {
        Ok(CompiledPatterns {
            pagination_link: selector(&self.pagination_link)?,
            listing_block: selector(&self.listing_block)?,
            summary_image: selector(&self.summary_image)?,
            summary_title: selector(&self.summary_title)?,
            summary_body: selector(&self.summary_body)?,
            summary_timestamp: selector(&self.summary_timestamp)?,
            detail_link: selector(&self.detail_link)?,
            breadcrumb: selector(&self.breadcrumb)?,
            breadcrumb_prefix: self.breadcrumb_prefix.clone(),
            article_body: selector(&self.article_body)?,
            attribution: selector(&self.attribution)?,
            paragraph: selector(&self.paragraph)?,
            paragraph_image: selector(&self.paragraph_image)?,
            labels: [
                (Attribution::Source, label_pattern(&self.source_label)?),
                (Attribution::Journalist, label_pattern(&self.journalist_label)?),
                (Attribution::Editor, label_pattern(&self.editor_label)?),
            ],
            timestamp: Regex::new(&self.timestamp)?,
            keywords: keyword_pattern(&self.keywords)?,
            utc_offset: FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
                Error::Config(format!("UTC offset out of range: {}s", self.utc_offset_seconds))
            })?,
        })
    }
}

/// Which record field an attribution span fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    Source,
    Journalist,
    Editor,
}

#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    pub pagination_link: Selector,
    pub listing_block: Selector,
    pub summary_image: Selector,
    pub summary_title: Selector,
    pub summary_body: Selector,
    pub summary_timestamp: Selector,
    pub detail_link: Selector,
    pub breadcrumb: Selector,
    pub breadcrumb_prefix: String,
    pub article_body: Selector,
    pub attribution: Selector,
    pub paragraph: Selector,
    pub paragraph_image: Selector,
    /// Checked in order; the first label that matches a span wins.
    pub labels: [(Attribution, Regex); 3],
    pub timestamp: Regex,
    pub keywords: Option<Regex>,
    pub utc_offset: FixedOffset,
}

impl CompiledPatterns {
    /// Returns the field and captured value for a `label：value` span.
    pub fn match_attribution(&self, text: &str) -> Option<(Attribution, String)> {
        let text = text.trim();
        self.labels.iter().find_map(|(field, pattern)| {
            let value = pattern.captures(text)?.name("value")?.as_str().trim();
            (!value.is_empty()).then(|| (*field, value.to_string()))
        })
    }

    /// `at` as the site's own wall clock, comparable with its timestamps.
    pub fn site_now(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.utc_offset).naive_local()
    }

    pub fn matches_keywords(&self, content: &str) -> bool {
        self.keywords
            .as_ref()
            .map_or(true, |pattern| pattern.is_match(content))
    }
}

fn selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| Error::Selector {
        selector: raw.to_string(),
        reason: format!("{:?}", e),
    })
}

fn label_pattern(label: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?s)^{}\s*[：:](?P<value>.*)$",
        regex::escape(label.trim())
    ))?)
}

fn keyword_pattern(keywords: &[String]) -> Result<Option<Regex>> {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()?,
    ))
}
