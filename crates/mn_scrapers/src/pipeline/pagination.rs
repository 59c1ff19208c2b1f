use std::collections::BTreeSet;

use scraper::Html;
use tracing::{debug, error};

use crate::patterns::CompiledPatterns;
use crate::request::{Callback, FetchRequest, ParseOutput};

/// Finds the pages of a section and queues each one for summary extraction.
///
/// Hrefs are appended to the directory of `page_url` as plain strings; the
/// site only ever links sibling pages (`index_2.html`), so no `<base>` or
/// scheme handling is attempted. No links at all is logged and skipped.
pub fn resolve_pages(page_url: &str, document: &Html, patterns: &CompiledPatterns) -> ParseOutput {
    let hrefs: BTreeSet<&str> = document
        .select(&patterns.pagination_link)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .collect();

    let mut output = ParseOutput::new();
    if hrefs.is_empty() {
        error!(url = %page_url, "No pagination links found, skipping section");
        return output;
    }

    let base = directory_of(page_url);
    for href in hrefs {
        output.add_request(FetchRequest::new(format!("{}{}", base, href), Callback::Listing));
    }
    debug!(url = %page_url, pages = output.requests.len(), "Resolved listing pages");
    output
}

/// Everything up to and including the last `/` of the path.
fn directory_of(url: &str) -> String {
    let path_start = url.find("://").map_or(0, |i| i + 3);
    match url[path_start..].rfind('/') {
        Some(i) => url[..path_start + i + 1].to_string(),
        None => format!("{}/", url),
    }
}
