//! Sequence-integrity tracking
//!
//! Venues disagree on how update continuity is proven. Some chain each
//! message to its predecessor's id while others stamp every batch with a
//! first/last id range. The trait below fixes only the verdict vocabulary;
//! each venue adapter supplies its own rule.

/// Verdict on one inbound update relative to tracked sequence state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Update continues the tracked sequence and may be applied
    Accept,
    /// Update is older than or a duplicate of already-applied state;
    /// discard without touching the ladder
    Stale,
    /// Update implies missed messages; the book must be cleared and
    /// rebuilt from a fresh snapshot
    Gap,
}

impl Verdict {
    /// True when the update may be applied
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Per-symbol sequence continuity rule
///
/// Call order matters: `initialize` seeds the tracker from a snapshot and
/// must run before any update is validated (and again after every forced
/// resync). `advance` runs only after an accepted update has been applied
/// to the ladder. `clear` resets to the uninitialized state whenever the
/// book itself is cleared.
///
/// An uninitialized tracker has no baseline to continue from, so `validate`
/// must return [`Verdict::Gap`] until the next `initialize`.
pub trait SequenceTracker {
    /// Venue snapshot payload this tracker seeds from
    type Snapshot;
    /// Venue update payload this tracker judges
    type Update;

    /// Seed tracking state from a snapshot
    fn initialize(&mut self, snapshot: &Self::Snapshot);

    /// Judge an update against the tracked sequence state
    fn validate(&self, update: &Self::Update) -> Verdict;

    /// Record an accepted update as the new baseline
    fn advance(&mut self, update: &Self::Update);

    /// Reset to uninitialized
    fn clear(&mut self);

    /// True once a snapshot has seeded the tracker
    fn is_initialized(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_is_accept() {
        assert!(Verdict::Accept.is_accept());
        assert!(!Verdict::Stale.is_accept());
        assert!(!Verdict::Gap.is_accept());
    }
}
