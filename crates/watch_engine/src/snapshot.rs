use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use watch_core::{Title, TitleSet};
use watch_logging::{watch_debug, watch_warn};

use crate::persist::{write_atomic, PersistError};

/// Where the two state files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub dir: PathBuf,
    pub previous_file: String,
    pub seen_file: String,
}

impl SnapshotPaths {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn previous_path(&self) -> PathBuf {
        self.dir.join(&self.previous_file)
    }

    pub fn seen_path(&self) -> PathBuf {
        self.dir.join(&self.seen_file)
    }
}

impl Default for SnapshotPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./logs"),
            previous_file: "prev_game_list.txt".to_string(),
            seen_file: "seen_game_list.txt".to_string(),
        }
    }
}

/// State carried between passes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredState {
    /// `None` until the first pass has written a snapshot.
    pub previous: Option<TitleSet>,
    pub seen_ever: TitleSet,
}

/// Reads and rewrites the previous snapshot and the seen-ever set, stored as
/// sorted text files with one title per line.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    paths: SnapshotPaths,
}

impl SnapshotStore {
    pub fn new(paths: SnapshotPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &SnapshotPaths {
        &self.paths
    }

    /// Never fails: absent or unreadable files count as missing.
    pub fn load(&self) -> StoredState {
        let previous = read_title_file(&self.paths.previous_path());
        let seen_ever = read_title_file(&self.paths.seen_path()).unwrap_or_default();
        StoredState {
            previous,
            seen_ever,
        }
    }

    pub fn save(&self, previous: &TitleSet, seen_ever: &TitleSet) -> Result<(), PersistError> {
        // Seen-ever goes first so an interrupted save never leaves the
        // snapshot holding titles the seen-ever file lacks.
        write_atomic(&self.paths.seen_path(), &render_titles(seen_ever))?;
        write_atomic(&self.paths.previous_path(), &render_titles(previous))?;
        watch_debug!(
            "saved {} titles to {:?} and {} to {:?}",
            previous.len(),
            self.paths.previous_path(),
            seen_ever.len(),
            self.paths.seen_path()
        );
        Ok(())
    }
}

fn read_title_file(path: &Path) -> Option<TitleSet> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text.lines().filter_map(Title::new).collect()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            watch_warn!("Failed to read {:?}, treating it as missing: {}", path, err);
            None
        }
    }
}

fn render_titles(titles: &TitleSet) -> String {
    titles
        .iter()
        .map(Title::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
