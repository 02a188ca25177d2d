/// Progress reported by a scrape pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// Page count read from the first listing page.
    PageCount { pages: u32 },
    /// A page was fetched and parsed.
    PageCollected { url: String, titles: usize },
    /// A page could not be fetched or decoded; it contributes no titles.
    PageFailed { url: String, error: PageError },
    /// Snapshot and seen-ever files were rewritten.
    SnapshotSaved { previous: usize, seen_ever: usize },
}

/// A listing page as it came off the wire, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Address after redirects.
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Why a single page produced no markup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("server answered {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("body larger than {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("not an html page ({0})")]
    ContentType(String),
    #[error("{0}")]
    Decode(String),
    #[error("network error: {0}")]
    Network(String),
}
