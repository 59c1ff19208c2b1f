use mn_core::{Error, NewsRecord, SummaryRecord};

/// What to do with a response once it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    /// A section entry page: find the pagination links.
    Pagination,
    /// A paginated listing page: extract article summaries.
    Listing,
    /// An article page, with the summary gathered from its listing block.
    Detail(SummaryRecord),
}

impl Callback {
    pub fn name(&self) -> &'static str {
        match self {
            Callback::Pagination => "pagination",
            Callback::Listing => "listing",
            Callback::Detail(_) => "detail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub callback: Callback,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, callback: Callback) -> Self {
        Self {
            url: url.into(),
            callback,
        }
    }

    /// Requests with the same fingerprint are fetched once per crawl.
    pub fn fingerprint(&self) -> String {
        format!("{}:{}", self.callback.name(), self.url)
    }
}

/// Everything a stage produces from one page.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub requests: Vec<FetchRequest>,
    pub record: Option<NewsRecord>,
    /// Listing blocks skipped for being older than the lookback window.
    pub stale: usize,
    /// The detail page was parsed but its content missed the keyword filter.
    pub filtered_out: bool,
    /// Set when the stage gave up part-way through the page. Requests
    /// gathered before the failure are still in `requests`.
    pub error: Option<Error>,
}

impl ParseOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_request(&mut self, request: FetchRequest) {
        self.requests.push(request);
    }

    pub fn with_record(record: NewsRecord) -> Self {
        Self {
            record: Some(record),
            ..Default::default()
        }
    }

    /// Stops the page here, keeping whatever was produced so far.
    pub fn fail(mut self, error: Error) -> Self {
        self.error = Some(error);
        self
    }

    pub fn filtered() -> Self {
        Self {
            filtered_out: true,
            ..Default::default()
        }
    }
}
