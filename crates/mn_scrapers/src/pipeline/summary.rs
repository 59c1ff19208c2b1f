use chrono::NaiveDateTime;
use mn_core::{Error, Result, SummaryRecord, DATETIME_FORMAT};
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, warn};
use url::Url;

use super::{element_text, StageContext};
use crate::request::{Callback, FetchRequest, ParseOutput};

/// Extracts one partial record per article block of a listing page and
/// queues a detail fetch for every article inside the lookback window.
///
/// A block with no timestamp span, or whose last span does not contain a
/// `YYYY-MM-DD HH:MM` timestamp, stops the page with
/// [`Error::InvalidTimestamp`] in [`ParseOutput::error`]: a timestamp that no
/// longer parses means the selectors no longer fit the markup. Blocks before
/// it keep their detail requests.
///
/// # Errors
///
/// Only when `page_url` itself is not a valid URL.
pub fn extract_summaries(page_url: &str, document: &Html, ctx: &StageContext<'_>) -> Result<ParseOutput> {
    let patterns = ctx.patterns;
    let cutoff = ctx
        .now
        .checked_sub_signed(ctx.config.lookback)
        .unwrap_or(NaiveDateTime::MIN);
    let base = Url::parse(page_url)?;
    let mut output = ParseOutput::new();

    for block in document.select(&patterns.listing_block) {
        let stamp_text = block
            .select(&patterns.summary_timestamp)
            .last()
            .map(element_text)
            .unwrap_or_default();
        let Some(datetime) = parse_timestamp(&stamp_text, &patterns.timestamp) else {
            return Ok(output.fail(Error::InvalidTimestamp {
                url: page_url.to_string(),
                text: stamp_text.trim().to_string(),
            }));
        };

        let title = first_text(block, &patterns.summary_title).unwrap_or_default();
        if datetime < cutoff {
            debug!(%title, %datetime, "Article older than lookback window, skipping");
            output.stale += 1;
            continue;
        }

        let Some(href) = block
            .select(&patterns.detail_link)
            .find_map(|a| a.value().attr("href"))
        else {
            warn!(url = %page_url, %title, "Listing block without a detail link");
            continue;
        };
        let detail_url = match base.join(href.trim()) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!(url = %page_url, %href, error = %e, "Unresolvable detail link");
                continue;
            }
        };

        let summary = SummaryRecord {
            url: detail_url.clone(),
            title,
            datetime,
            summary_pic_url: block
                .select(&patterns.summary_image)
                .find_map(|img| img.value().attr("src"))
                .map(|src| src.trim().to_string()),
            summary_content: first_text(block, &patterns.summary_body).unwrap_or_default(),
        };
        output.add_request(FetchRequest::new(detail_url, Callback::Detail(summary)));
    }

    debug!(
        url = %page_url,
        queued = output.requests.len(),
        stale = output.stale,
        "Extracted listing summaries"
    );
    Ok(output)
}

/// Finds a `YYYY-MM-DD HH:MM` timestamp anywhere in `text`.
pub fn parse_timestamp(text: &str, pattern: &Regex) -> Option<NaiveDateTime> {
    let found = pattern.find(text)?;
    NaiveDateTime::parse_from_str(found.as_str(), DATETIME_FORMAT).ok()
}

fn first_text(block: ElementRef<'_>, selector: &scraper::Selector) -> Option<String> {
    block
        .select(selector)
        .next()
        .map(|el| element_text(el).trim().to_string())
}
