use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use watch_core::{Title, TitleSet};
use watch_engine::{SnapshotPaths, SnapshotStore, StoredState};

fn set(titles: &[&str]) -> TitleSet {
    titles.iter().filter_map(|t| Title::new(t)).collect()
}

#[test]
fn absent_files_mean_no_snapshot_and_nothing_seen() {
    let temp = TempDir::new().unwrap();
    let store = SnapshotStore::new(SnapshotPaths::in_dir(temp.path().join("missing")));

    assert_eq!(store.load(), StoredState::default());
}

#[test]
fn save_writes_sorted_lines_and_load_reads_them_back() {
    let temp = TempDir::new().unwrap();
    let paths = SnapshotPaths::in_dir(temp.path().join("logs"));
    let store = SnapshotStore::new(paths.clone());

    store
        .save(&set(&["Zelda", "Astro Bot"]), &set(&["Zelda", "Astro Bot", "Bloodborne"]))
        .unwrap();

    assert_eq!(
        fs::read_to_string(paths.previous_path()).unwrap(),
        "Astro Bot\nZelda"
    );
    assert_eq!(
        fs::read_to_string(paths.seen_path()).unwrap(),
        "Astro Bot\nBloodborne\nZelda"
    );

    let loaded = store.load();
    assert_eq!(loaded.previous, Some(set(&["Astro Bot", "Zelda"])));
    assert_eq!(loaded.seen_ever, set(&["Astro Bot", "Bloodborne", "Zelda"]));
}

#[test]
fn empty_snapshot_file_is_an_existing_empty_snapshot() {
    let temp = TempDir::new().unwrap();
    let paths = SnapshotPaths::in_dir(temp.path());
    fs::write(paths.previous_path(), "").unwrap();

    let loaded = SnapshotStore::new(paths).load();

    assert_eq!(loaded.previous, Some(TitleSet::new()));
    assert!(loaded.seen_ever.is_empty());
}

#[test]
fn blank_and_crlf_lines_are_normalized_on_load() {
    let temp = TempDir::new().unwrap();
    let paths = SnapshotPaths::in_dir(temp.path());
    fs::write(paths.previous_path(), "A\r\n\r\nB\n").unwrap();

    let loaded = SnapshotStore::new(paths).load();

    assert_eq!(loaded.previous, Some(set(&["A", "B"])));
}

#[test]
fn unreadable_snapshot_is_treated_as_missing() {
    let temp = TempDir::new().unwrap();
    let paths = SnapshotPaths::in_dir(temp.path());
    // A directory where the file should be cannot be read as text.
    fs::create_dir(paths.previous_path()).unwrap();
    fs::write(paths.seen_path(), "A").unwrap();

    let loaded = SnapshotStore::new(paths).load();

    assert_eq!(loaded.previous, None);
    assert_eq!(loaded.seen_ever, set(&["A"]));
}

#[test]
fn file_names_are_configurable() {
    let temp = TempDir::new().unwrap();
    let paths = SnapshotPaths {
        dir: temp.path().to_path_buf(),
        previous_file: "current.txt".to_string(),
        seen_file: "history.txt".to_string(),
    };
    SnapshotStore::new(paths).save(&set(&["A"]), &set(&["A"])).unwrap();

    assert!(temp.path().join("current.txt").is_file());
    assert!(temp.path().join("history.txt").is_file());
}

#[test]
fn failed_snapshot_write_keeps_previous_within_seen_ever() {
    let temp = TempDir::new().unwrap();
    let paths = SnapshotPaths::in_dir(temp.path());
    fs::write(paths.seen_path(), "A").unwrap();
    // A non-empty directory at the snapshot path cannot be renamed over.
    fs::create_dir(paths.previous_path()).unwrap();
    fs::write(paths.previous_path().join("keep"), "x").unwrap();
    let store = SnapshotStore::new(paths.clone());

    let result = store.save(&set(&["A", "New"]), &set(&["A", "New"]));

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(paths.seen_path()).unwrap(), "A\nNew");
    let loaded = store.load();
    let previous = loaded.previous.unwrap_or_default();
    assert!(previous.is_subset(&loaded.seen_ever));
}
