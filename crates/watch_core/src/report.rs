use crate::{DiffKind, DiffOutcome, TitleSet};

pub const SUBJECT: &str = "Listing watch: game list changed";
pub const TEST_SUBJECT: &str = "Listing watch: test message";
pub const NEW_HEADER: &str = "### New games found ###";
pub const REMOVED_HEADER: &str = "### Removed games found ###";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    /// Include removals. Additions are always included.
    pub notify_removed: bool,
}

/// Plain-text summary handed to the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub body: String,
}

impl Report {
    /// Builds the change summary, or `None` when there is nothing to report
    /// under `options`. A bootstrap pass is never reported.
    pub fn from_outcome(outcome: &DiffOutcome, options: ReportOptions) -> Option<Self> {
        if outcome.kind == DiffKind::Bootstrap {
            return None;
        }
        let include_removed = options.notify_removed && !outcome.removed.is_empty();
        if outcome.added.is_empty() && !include_removed {
            return None;
        }

        let mut body = String::new();
        if !outcome.added.is_empty() {
            push_section(&mut body, NEW_HEADER, &outcome.added);
        }
        if include_removed {
            push_section(&mut body, REMOVED_HEADER, &outcome.removed);
        }

        Some(Self {
            subject: SUBJECT.to_string(),
            body,
        })
    }

    /// Fixed message used to check the relay configuration.
    pub fn test_message() -> Self {
        Self {
            subject: TEST_SUBJECT.to_string(),
            body: "This is a test message from listing-watch.\n\
                   If you can read this, email notifications are configured correctly.\n"
                .to_string(),
        }
    }
}

fn push_section(body: &mut String, header: &str, titles: &TitleSet) {
    if !body.is_empty() {
        body.push('\n');
    }
    body.push_str(header);
    body.push_str("\n\n");
    for title in titles {
        body.push_str(title.as_str());
        body.push('\n');
    }
}
