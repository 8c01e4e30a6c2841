//! Scripted venue doubles for unit tests
//!
//! A minimal venue with a single running sequence number and pass-through
//! payloads, so engine behavior can be exercised without any real adapter.

use crate::strategy::UpdateStrategy;
use crate::tracker::{SequenceTracker, Verdict};
use lobsync_types::{BookDeltas, ParseError, PriceLevel};
use rust_decimal::Decimal;

/// Scripted snapshot payload
#[derive(Debug, Clone, Default)]
pub struct ScriptSnapshot {
    pub seq: u64,
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
}

/// Scripted diff payload
#[derive(Debug, Clone, Default)]
pub struct ScriptUpdate {
    pub seq: u64,
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
}

/// Build a scripted snapshot
pub fn snap(seq: u64, bids: Vec<(Decimal, Decimal)>, asks: Vec<(Decimal, Decimal)>) -> ScriptSnapshot {
    ScriptSnapshot { seq, bids, asks }
}

/// Build a scripted diff
pub fn diff(seq: u64, bids: Vec<(Decimal, Decimal)>, asks: Vec<(Decimal, Decimal)>) -> ScriptUpdate {
    ScriptUpdate { seq, bids, asks }
}

/// Exact-contiguity tracker over the scripted sequence number
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptTracker {
    last: Option<u64>,
}

impl SequenceTracker for ScriptTracker {
    type Snapshot = ScriptSnapshot;
    type Update = ScriptUpdate;

    fn initialize(&mut self, snapshot: &ScriptSnapshot) {
        self.last = Some(snapshot.seq);
    }

    fn validate(&self, update: &ScriptUpdate) -> Verdict {
        match self.last {
            None => Verdict::Gap,
            Some(last) if update.seq <= last => Verdict::Stale,
            Some(last) if update.seq == last + 1 => Verdict::Accept,
            Some(_) => Verdict::Gap,
        }
    }

    fn advance(&mut self, update: &ScriptUpdate) {
        self.last = Some(update.seq);
    }

    fn clear(&mut self) {
        self.last = None;
    }

    fn is_initialized(&self) -> bool {
        self.last.is_some()
    }
}

/// Pass-through strategy for scripted payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptStrategy;

impl UpdateStrategy for ScriptStrategy {
    type Snapshot = ScriptSnapshot;
    type Update = ScriptUpdate;

    fn parse_snapshot(&self, snapshot: &ScriptSnapshot) -> Result<BookDeltas, ParseError> {
        Ok(to_deltas(&snapshot.bids, &snapshot.asks))
    }

    fn parse_update(&self, update: &ScriptUpdate) -> Result<BookDeltas, ParseError> {
        Ok(to_deltas(&update.bids, &update.asks))
    }
}

/// Strategy whose diffs never decode, for the malformed-payload path
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenStrategy;

impl UpdateStrategy for BrokenStrategy {
    type Snapshot = ScriptSnapshot;
    type Update = ScriptUpdate;

    fn parse_snapshot(&self, snapshot: &ScriptSnapshot) -> Result<BookDeltas, ParseError> {
        Ok(to_deltas(&snapshot.bids, &snapshot.asks))
    }

    fn parse_update(&self, _update: &ScriptUpdate) -> Result<BookDeltas, ParseError> {
        Err(ParseError::MissingField("bids"))
    }
}

fn to_deltas(bids: &[(Decimal, Decimal)], asks: &[(Decimal, Decimal)]) -> BookDeltas {
    BookDeltas::new(
        bids.iter().map(|(p, s)| PriceLevel::new(*p, *s)).collect(),
        asks.iter().map(|(p, s)| PriceLevel::new(*p, *s)).collect(),
    )
}
