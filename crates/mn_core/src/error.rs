use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A selector string from the site patterns could not be parsed.
    #[error("Invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    /// The listing timestamp is missing or does not look like `YYYY-MM-DD HH:MM`.
    /// Usually means the site markup changed under the selectors.
    #[error("Invalid timestamp {text:?} on {url}")]
    InvalidTimestamp { url: String, text: String },

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Hard failures abort the page they were raised on; everything else is
    /// a transport or setup problem.
    pub fn is_markup_drift(&self) -> bool {
        matches!(self, Error::InvalidTimestamp { .. })
    }
}
