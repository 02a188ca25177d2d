//! Listing watcher engine: page fetching, extraction, state files and mail.
mod decode;
mod extract;
mod fetch;
mod notify;
mod persist;
mod pipeline;
mod snapshot;
mod source;
mod types;

pub use decode::{decode_body, DecodeError, DecodedBody};
pub use extract::{
    extract_titles, max_page_number, ListingMarkers, DEFAULT_PAGINATION_CLASS, DEFAULT_TITLE_CLASS,
};
pub use fetch::{fetch_all, FetchSettings, Fetcher, ReqwestFetcher};
pub use notify::{HttpRelayMailer, Mailer, NotifyError, RelaySettings};
pub use persist::{ensure_state_dir, write_atomic, PersistError};
pub use pipeline::{
    run_pass, LogProgressSink, PassError, PassSummary, ProgressSink, WatchConfig,
    DEFAULT_CONCURRENCY,
};
pub use snapshot::{SnapshotPaths, SnapshotStore, StoredState};
pub use source::{ListingSource, SourceError, DEFAULT_LISTING_URL, PAGE_PLACEHOLDER};
pub use types::{FetchedPage, PageError, WatchEvent};
