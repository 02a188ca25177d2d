use std::path::PathBuf;

use watch_core::{diff, DiffOutcome, DiffPolicy};
use watch_logging::{watch_info, watch_warn};

use crate::decode::decode_body;
use crate::extract::{extract_titles, max_page_number, ListingMarkers};
use crate::fetch::{fetch_all, FetchSettings, Fetcher};
use crate::persist::PersistError;
use crate::snapshot::{SnapshotPaths, SnapshotStore};
use crate::source::ListingSource;
use crate::{FetchedPage, PageError, WatchEvent};

pub const DEFAULT_CONCURRENCY: usize = 8;

/// Everything one scrape pass needs; passed in explicitly, never global.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub source: ListingSource,
    pub markers: ListingMarkers,
    pub fetch: FetchSettings,
    pub snapshot: SnapshotPaths,
    pub policy: DiffPolicy,
    /// Maximum page requests in flight.
    pub concurrency: usize,
}

impl WatchConfig {
    pub fn default_with_state_dir(state_dir: PathBuf) -> Self {
        Self {
            source: ListingSource::default(),
            markers: ListingMarkers::default(),
            fetch: FetchSettings::default(),
            snapshot: SnapshotPaths::in_dir(state_dir),
            policy: DiffPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: WatchEvent);
}

/// Sink that writes pass progress to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: WatchEvent) {
        match event {
            WatchEvent::PageCount { pages } => watch_info!("Max page number: {}", pages),
            WatchEvent::PageCollected { url, titles } => {
                watch_info!("Collected {} games from: {}", titles, url)
            }
            WatchEvent::PageFailed { url, error } => {
                watch_warn!("Skipping {}: {}", url, error)
            }
            WatchEvent::SnapshotSaved {
                previous,
                seen_ever,
            } => watch_info!(
                "Snapshot saved ({} current, {} seen ever)",
                previous,
                seen_ever
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub page_count: u32,
    pub failed_pages: Vec<(String, PageError)>,
    /// Size of the collected title set.
    pub collected: usize,
    pub outcome: DiffOutcome,
}

#[derive(Debug, thiserror::Error)]
pub enum PassError {
    #[error("first listing page {url} unavailable: {error}")]
    FirstPage { url: String, error: PageError },
    #[error("could not save snapshot: {0}")]
    Persist(#[from] PersistError),
}

/// One full scrape pass: page count, fan-out, union, diff, save.
///
/// Individual pages after the first may fail without aborting the pass;
/// they contribute no titles. The state files are untouched unless the
/// pass reaches the save step.
pub async fn run_pass(
    config: &WatchConfig,
    fetcher: &dyn Fetcher,
    sink: &dyn ProgressSink,
) -> Result<PassSummary, PassError> {
    let first_url = config.source.page_url(1);
    let first_markup = match fetcher.fetch(&first_url).await.and_then(|page| decode_page(&page)) {
        Ok(markup) => markup,
        Err(error) => {
            return Err(PassError::FirstPage {
                url: first_url,
                error,
            })
        }
    };

    let page_count = max_page_number(&first_markup, &config.markers);
    sink.emit(WatchEvent::PageCount { pages: page_count });

    let mut collected = extract_titles(&first_markup, &config.markers);
    sink.emit(WatchEvent::PageCollected {
        url: first_url,
        titles: collected.len(),
    });

    let mut failed_pages = Vec::new();
    let urls = config.source.remaining_page_urls(page_count);
    for (url, result) in fetch_all(fetcher, &urls, config.concurrency).await {
        match result.and_then(|page| decode_page(&page)) {
            Ok(markup) => {
                let titles = extract_titles(&markup, &config.markers);
                sink.emit(WatchEvent::PageCollected {
                    url,
                    titles: titles.len(),
                });
                collected.extend(titles);
            }
            Err(error) => {
                sink.emit(WatchEvent::PageFailed {
                    url: url.clone(),
                    error: error.clone(),
                });
                failed_pages.push((url, error));
            }
        }
    }

    let store = SnapshotStore::new(config.snapshot.clone());
    let stored = store.load();
    let outcome = diff(
        &collected,
        stored.previous.as_ref(),
        &stored.seen_ever,
        config.policy,
    );
    store.save(&outcome.previous, &outcome.seen_ever)?;
    sink.emit(WatchEvent::SnapshotSaved {
        previous: outcome.previous.len(),
        seen_ever: outcome.seen_ever.len(),
    });

    Ok(PassSummary {
        page_count,
        failed_pages,
        collected: collected.len(),
        outcome,
    })
}

fn decode_page(page: &FetchedPage) -> Result<String, PageError> {
    decode_body(&page.body, page.content_type.as_deref())
        .map(|decoded| decoded.markup)
        .map_err(|err| PageError::Decode(err.to_string()))
}
