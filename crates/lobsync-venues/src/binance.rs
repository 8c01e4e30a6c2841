//! Binance-style venue adapter
//!
//! A ranged-id venue: snapshots come from a REST depth endpoint stamped
//! with `lastUpdateId`, while stream events span an id range `U..=u`.
//! An event may overlap the snapshot (its range begins at or before the
//! baseline) and still be applied; only a range starting beyond
//! `baseline + 1` proves messages were dropped. Sizes are already in base
//! units, so books for this venue run with `normalize_sizes = false`.

use lobsync_book::{BookSet, Orderbook, SequenceTracker, UpdateStrategy, Verdict};
use lobsync_types::{deserialize_decimal, BookDeltas, ParseError, PriceLevel};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Per-symbol book wired for this venue
pub type BinanceBook = Orderbook<BinanceStrategy, BinanceTracker>;

/// Multi-symbol book set wired for this venue
pub type BinanceBooks = BookSet<BinanceStrategy, BinanceTracker>;

// ============================================================================
// Wire Types
// ============================================================================

/// One `["price", "qty"]` wire pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BinancePair(
    #[serde(deserialize_with = "deserialize_decimal")] pub Decimal,
    #[serde(deserialize_with = "deserialize_decimal")] pub Decimal,
);

/// REST depth snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceDepthSnapshot {
    /// Id of the last event folded into this snapshot
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: u64,
    /// Bid levels, best first
    pub bids: Vec<BinancePair>,
    /// Ask levels, best first
    pub asks: Vec<BinancePair>,
}

/// Incremental depth event from the stream
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceDepthUpdate {
    /// Instrument symbol
    #[serde(rename = "s")]
    pub symbol: String,
    /// Event time in milliseconds
    #[serde(rename = "E", default)]
    pub event_time: Option<u64>,
    /// First update id in this event
    #[serde(rename = "U")]
    pub first_update_id: u64,
    /// Final update id in this event
    #[serde(rename = "u")]
    pub final_update_id: u64,
    /// Bid deltas (qty 0 removes the level)
    #[serde(rename = "b", default)]
    pub bids: Vec<BinancePair>,
    /// Ask deltas
    #[serde(rename = "a", default)]
    pub asks: Vec<BinancePair>,
}

// ============================================================================
// Strategy
// ============================================================================

/// Decodes `["price", "qty"]` pairs into book deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct BinanceStrategy;

impl BinanceStrategy {
    fn parse_pairs(pairs: &[BinancePair]) -> Result<Vec<PriceLevel>, ParseError> {
        pairs
            .iter()
            .map(|BinancePair(price, qty)| {
                if *qty < Decimal::ZERO {
                    return Err(ParseError::NegativeSize {
                        price: *price,
                        size: *qty,
                    });
                }
                Ok(PriceLevel::new(*price, *qty))
            })
            .collect()
    }
}

impl UpdateStrategy for BinanceStrategy {
    type Snapshot = BinanceDepthSnapshot;
    type Update = BinanceDepthUpdate;

    fn parse_snapshot(&self, snapshot: &BinanceDepthSnapshot) -> Result<BookDeltas, ParseError> {
        Ok(BookDeltas::new(
            Self::parse_pairs(&snapshot.bids)?,
            Self::parse_pairs(&snapshot.asks)?,
        ))
    }

    fn parse_update(&self, update: &BinanceDepthUpdate) -> Result<BookDeltas, ParseError> {
        Ok(BookDeltas::new(
            Self::parse_pairs(&update.bids)?,
            Self::parse_pairs(&update.asks)?,
        ))
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// Ranged-id continuity rule keyed on the final update id
///
/// Stale when the whole range is at or below the baseline. A gap when the
/// range starts beyond `baseline + 1`. Everything in between is accepted,
/// which tolerates events overlapping the snapshot per the venue's
/// documented recovery procedure.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinanceTracker {
    last_id: Option<u64>,
}

impl SequenceTracker for BinanceTracker {
    type Snapshot = BinanceDepthSnapshot;
    type Update = BinanceDepthUpdate;

    fn initialize(&mut self, snapshot: &BinanceDepthSnapshot) {
        self.last_id = Some(snapshot.last_update_id);
    }

    fn validate(&self, update: &BinanceDepthUpdate) -> Verdict {
        let last = match self.last_id {
            Some(last) => last,
            None => return Verdict::Gap,
        };
        if update.final_update_id <= last {
            return Verdict::Stale;
        }
        if update.first_update_id > last + 1 {
            return Verdict::Gap;
        }
        Verdict::Accept
    }

    fn advance(&mut self, update: &BinanceDepthUpdate) {
        self.last_id = Some(update.final_update_id);
    }

    fn clear(&mut self) {
        self.last_id = None;
    }

    fn is_initialized(&self) -> bool {
        self.last_id.is_some()
    }
}
