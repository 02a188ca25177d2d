use std::collections::BTreeSet;
use std::fmt;

/// Ordered set of titles; iteration yields them sorted, which is the order
/// used for persistence and reports.
pub type TitleSet = BTreeSet<Title>;

/// A product title as shown on the listing, with embedded line breaks removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Title(String);

impl Title {
    /// Normalizes raw element text into a title.
    ///
    /// Returns `None` when nothing is left after removing line breaks.
    pub fn new(raw: &str) -> Option<Self> {
        let cleaned: String = raw.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
        if cleaned.trim().is_empty() {
            None
        } else {
            Some(Self(cleaned))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
