use crate::TitleSet;

/// Knobs for the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffPolicy {
    /// Titles already in the seen-ever set are never reported as new, even
    /// when they were absent from the previous snapshot.
    pub suppress_seen: bool,
}

impl Default for DiffPolicy {
    fn default() -> Self {
        Self {
            suppress_seen: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// No snapshot existed; the collected set becomes the baseline.
    Bootstrap,
    /// A snapshot existed and was compared against.
    Compared,
}

/// Result of comparing one pass against the stored state.
///
/// `previous` and `seen_ever` are the sets to persist for the next pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutcome {
    pub kind: DiffKind,
    pub added: TitleSet,
    pub removed: TitleSet,
    pub previous: TitleSet,
    pub seen_ever: TitleSet,
}

impl DiffOutcome {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Pure comparison of a freshly collected set against the stored state.
///
/// Removals are never filtered: a title that stays absent is reported on
/// every pass. The seen-ever set only ever grows.
pub fn diff(
    collected: &TitleSet,
    previous: Option<&TitleSet>,
    seen_ever: &TitleSet,
    policy: DiffPolicy,
) -> DiffOutcome {
    let updated_seen: TitleSet = seen_ever.union(collected).cloned().collect();

    let Some(previous) = previous else {
        return DiffOutcome {
            kind: DiffKind::Bootstrap,
            added: TitleSet::new(),
            removed: TitleSet::new(),
            previous: collected.clone(),
            seen_ever: updated_seen,
        };
    };

    let added = collected
        .difference(previous)
        .filter(|title| !(policy.suppress_seen && seen_ever.contains(*title)))
        .cloned()
        .collect();
    let removed = previous.difference(collected).cloned().collect();

    DiffOutcome {
        kind: DiffKind::Compared,
        added,
        removed,
        previous: collected.clone(),
        seen_ever: updated_seen,
    }
}
