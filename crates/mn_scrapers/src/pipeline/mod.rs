//! The extraction pipeline: pagination → listing summaries → article detail.
//!
//! Each stage is a synchronous function from one parsed page (plus whatever
//! the request carried) to a [`ParseOutput`]. Stages never touch the network
//! and share no state, so any scheduler can drive them.

use chrono::NaiveDateTime;
use mn_core::Result;
use scraper::{ElementRef, Html};

use crate::config::CrawlConfig;
use crate::patterns::CompiledPatterns;
use crate::request::{Callback, FetchRequest, ParseOutput};

pub mod detail;
pub mod pagination;
pub mod summary;

pub use detail::{extract_detail, extract_fields};
pub use pagination::resolve_pages;
pub use summary::extract_summaries;

/// Read-only inputs shared by every stage of a crawl.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub patterns: &'a CompiledPatterns,
    pub config: &'a CrawlConfig,
    /// Reference time for the lookback window.
    pub now: NaiveDateTime,
}

/// Routes a response to the stage its request asked for.
pub fn dispatch(request: &FetchRequest, document: &Html, ctx: &StageContext<'_>) -> Result<ParseOutput> {
    match &request.callback {
        Callback::Pagination => Ok(resolve_pages(&request.url, document, ctx.patterns)),
        Callback::Listing => extract_summaries(&request.url, document, ctx),
        Callback::Detail(summary) => Ok(extract_detail(summary, document, ctx)),
    }
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}
