use std::fs;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use watch_core::{DiffKind, Title, TitleSet};
use watch_engine::{
    run_pass, ListingSource, PageError, PassError, ProgressSink, ReqwestFetcher, WatchConfig,
    WatchEvent, DEFAULT_TITLE_CLASS,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<WatchEvent>>>,
}

impl TestSink {
    fn take(&self) -> Vec<WatchEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: WatchEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn fetcher(config: &WatchConfig) -> ReqwestFetcher {
    ReqwestFetcher::new(config.fetch.clone()).expect("client builds")
}

fn set(titles: &[&str]) -> TitleSet {
    titles.iter().filter_map(|t| Title::new(t)).collect()
}

fn listing_page(titles: &[&str], pages: u32) -> String {
    let anchors: String = titles
        .iter()
        .map(|t| format!("<li><a class=\"{DEFAULT_TITLE_CLASS}\" href=\"#\">\n{t}\n</a></li>"))
        .collect();
    let pagination: String = (1..=pages)
        .map(|p| format!("<a class=\"js_pagination_item\" href=\"?page={p}\">{p}</a>"))
        .collect();
    format!("<html><body><ul>{anchors}</ul><nav>{pagination}</nav></body></html>")
}

async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/games"))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

fn config_for(server: &MockServer, state: &TempDir) -> WatchConfig {
    let mut config = WatchConfig::default_with_state_dir(state.path().join("logs"));
    config.source = ListingSource::new(format!("{}/games?page={{page}}", server.uri())).unwrap();
    config
}

#[tokio::test]
async fn first_pass_collects_all_pages_and_writes_baseline() {
    let server = MockServer::start().await;
    mount_page(&server, 1, html(listing_page(&["Astro Bot", "Bloodborne"], 3))).await;
    mount_page(&server, 2, html(listing_page(&["Returnal", "Astro Bot"], 3))).await;
    mount_page(&server, 3, html(listing_page(&["Ghost of Tsushima"], 3))).await;
    let state = TempDir::new().unwrap();
    let config = config_for(&server, &state);
    let sink = TestSink::default();

    let summary = run_pass(&config, &fetcher(&config), &sink)
        .await
        .expect("pass ok");

    assert_eq!(summary.page_count, 3);
    assert!(summary.failed_pages.is_empty());
    assert_eq!(summary.collected, 4);
    assert_eq!(summary.outcome.kind, DiffKind::Bootstrap);
    assert!(!summary.outcome.has_changes());
    assert_eq!(
        fs::read_to_string(config.snapshot.previous_path()).unwrap(),
        "Astro Bot\nBloodborne\nGhost of Tsushima\nReturnal"
    );
    assert_eq!(
        fs::read_to_string(config.snapshot.seen_path()).unwrap(),
        "Astro Bot\nBloodborne\nGhost of Tsushima\nReturnal"
    );

    let events = sink.take();
    assert_eq!(events[0], WatchEvent::PageCount { pages: 3 });
    let collected_pages = events
        .iter()
        .filter(|e| matches!(e, WatchEvent::PageCollected { .. }))
        .count();
    assert_eq!(collected_pages, 3);
    assert!(matches!(events.last(), Some(WatchEvent::SnapshotSaved { previous: 4, seen_ever: 4 })));
}

#[tokio::test]
async fn failed_page_is_skipped_without_aborting_pass() {
    let server = MockServer::start().await;
    mount_page(&server, 1, html(listing_page(&["Astro Bot"], 3))).await;
    mount_page(&server, 2, ResponseTemplate::new(503)).await;
    mount_page(&server, 3, html(listing_page(&["Returnal"], 3))).await;
    let state = TempDir::new().unwrap();
    let config = config_for(&server, &state);
    let sink = TestSink::default();

    let summary = run_pass(&config, &fetcher(&config), &sink)
        .await
        .expect("pass ok");

    assert_eq!(summary.outcome.previous, set(&["Astro Bot", "Returnal"]));
    assert_eq!(summary.failed_pages.len(), 1);
    let (url, error) = &summary.failed_pages[0];
    assert_eq!(url, &config.source.page_url(2));
    assert_eq!(error, &PageError::Status(503));
    assert!(sink
        .take()
        .iter()
        .any(|e| matches!(e, WatchEvent::PageFailed { .. })));
}

#[tokio::test]
async fn later_pass_reports_changes_against_stored_state() {
    let server = MockServer::start().await;
    mount_page(&server, 1, html(listing_page(&["Astro Bot", "Bloodborne", "Returnal"], 1))).await;
    let state = TempDir::new().unwrap();
    let config = config_for(&server, &state);
    fs::create_dir_all(&config.snapshot.dir).unwrap();
    fs::write(config.snapshot.previous_path(), "Astro Bot\nDeath Stranding").unwrap();
    fs::write(
        config.snapshot.seen_path(),
        "Astro Bot\nBloodborne\nDeath Stranding",
    )
    .unwrap();

    let summary = run_pass(
        &config,
        &fetcher(&config),
        &TestSink::default(),
    )
    .await
    .expect("pass ok");

    assert_eq!(summary.page_count, 1);
    assert_eq!(summary.outcome.kind, DiffKind::Compared);
    // Bloodborne was seen in an earlier pass, so only Returnal is new.
    assert_eq!(summary.outcome.added, set(&["Returnal"]));
    assert_eq!(summary.outcome.removed, set(&["Death Stranding"]));
    assert_eq!(
        fs::read_to_string(config.snapshot.previous_path()).unwrap(),
        "Astro Bot\nBloodborne\nReturnal"
    );
    assert_eq!(
        fs::read_to_string(config.snapshot.seen_path()).unwrap(),
        "Astro Bot\nBloodborne\nDeath Stranding\nReturnal"
    );
}

#[tokio::test]
async fn unavailable_first_page_abandons_pass_and_keeps_files() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(500)).await;
    let state = TempDir::new().unwrap();
    let config = config_for(&server, &state);
    fs::create_dir_all(&config.snapshot.dir).unwrap();
    fs::write(config.snapshot.previous_path(), "Astro Bot").unwrap();

    let err = run_pass(
        &config,
        &fetcher(&config),
        &TestSink::default(),
    )
    .await
    .unwrap_err();

    match err {
        PassError::FirstPage { url, error } => {
            assert_eq!(url, config.source.page_url(1));
            assert_eq!(error, PageError::Status(500));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        fs::read_to_string(config.snapshot.previous_path()).unwrap(),
        "Astro Bot"
    );
    assert!(!config.snapshot.seen_path().exists());
}
