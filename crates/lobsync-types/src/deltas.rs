//! Venue-neutral book deltas
//!
//! Every venue payload, snapshot or incremental, reduces to a pair of
//! level lists. A level with zero (or negative) size is a removal,
//! anything else is an absolute overwrite of that price.

use crate::level::PriceLevel;
use serde::{Deserialize, Serialize};

/// Parsed, venue-neutral content of a book payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDeltas {
    /// Bid levels in payload order
    pub bids: Vec<PriceLevel>,
    /// Ask levels in payload order
    pub asks: Vec<PriceLevel>,
}

impl BookDeltas {
    /// Create deltas from bid and ask level lists
    pub fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { bids, asks }
    }

    /// Total number of levels across both sides
    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// True when the payload carried no levels at all
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
