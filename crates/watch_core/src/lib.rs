//! Listing watcher core: title model, snapshot diffing and report formatting.
//!
//! Nothing in here touches the network or the filesystem.
mod diff;
mod report;
mod title;

pub use diff::{diff, DiffKind, DiffOutcome, DiffPolicy};
pub use report::{Report, ReportOptions, NEW_HEADER, REMOVED_HEADER, SUBJECT, TEST_SUBJECT};
pub use title::{Title, TitleSet};
