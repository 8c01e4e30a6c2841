//! BTreeMap-based price ladder
//!
//! Provides O(log N) operations for both book sides.
//! Uses `Reverse<Decimal>` for bids to maintain descending order.

use lobsync_types::{PriceLevel, Side};
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Dual-sided price ladder with O(log N) level operations
///
/// - Bids: stored with `Reverse<Decimal>` keys, so iteration runs highest
///   price first and the last entry is the worst bid
/// - Asks: stored with `Decimal` keys, so iteration runs lowest price first
///   and the last entry is the worst ask
///
/// On either side the worst level is the last entry, which is what lets
/// [`enforce_limit`](Ladder::enforce_limit) evict via `pop_last` without
/// rescanning the map.
#[derive(Debug, Clone, Default)]
pub struct Ladder {
    /// Bids: highest price first
    bids: BTreeMap<Reverse<Decimal>, Decimal>,
    /// Asks: lowest price first
    asks: BTreeMap<Decimal, Decimal>,
}

impl Ladder {
    /// Create a new empty ladder
    pub fn new() -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
        }
    }

    /// Insert or overwrite a level
    ///
    /// A size of zero or below removes the level (no-op when absent), so the
    /// ladder never stores a non-positive size.
    pub fn upsert(&mut self, side: Side, price: Decimal, size: Decimal) {
        if size <= Decimal::ZERO {
            self.remove(side, &price);
            return;
        }
        match side {
            Side::Bid => {
                self.bids.insert(Reverse(price), size);
            }
            Side::Ask => {
                self.asks.insert(price, size);
            }
        }
    }

    /// Remove a level by price
    pub fn remove(&mut self, side: Side, price: &Decimal) {
        match side {
            Side::Bid => {
                self.bids.remove(&Reverse(*price));
            }
            Side::Ask => {
                self.asks.remove(price);
            }
        }
    }

    /// Get the resting size at a price, if the level exists
    pub fn size_at(&self, side: Side, price: &Decimal) -> Option<Decimal> {
        match side {
            Side::Bid => self.bids.get(&Reverse(*price)).copied(),
            Side::Ask => self.asks.get(price).copied(),
        }
    }

    /// Get the best level on a side (highest bid, lowest ask)
    pub fn best(&self, side: Side) -> Option<PriceLevel> {
        match side {
            Side::Bid => self
                .bids
                .iter()
                .next()
                .map(|(Reverse(price), size)| PriceLevel::new(*price, *size)),
            Side::Ask => self
                .asks
                .iter()
                .next()
                .map(|(price, size)| PriceLevel::new(*price, *size)),
        }
    }

    /// Get the best bid (highest price)
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.best(Side::Bid)
    }

    /// Get the best ask (lowest price)
    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.best(Side::Ask)
    }

    /// Iterator over bid levels (highest to lowest price)
    pub fn bids(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.bids
            .iter()
            .map(|(Reverse(price), size)| PriceLevel::new(*price, *size))
    }

    /// Iterator over ask levels (lowest to highest price)
    pub fn asks(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.asks
            .iter()
            .map(|(price, size)| PriceLevel::new(*price, *size))
    }

    /// Get one side as a vector, best to worst (for serialization)
    pub fn side_vec(&self, side: Side) -> Vec<PriceLevel> {
        match side {
            Side::Bid => self.bids().collect(),
            Side::Ask => self.asks().collect(),
        }
    }

    /// Get the top N levels on a side, best to worst
    pub fn top(&self, side: Side, n: usize) -> Vec<PriceLevel> {
        match side {
            Side::Bid => self.bids().take(n).collect(),
            Side::Ask => self.asks().take(n).collect(),
        }
    }

    /// Number of levels on a side
    pub fn depth(&self, side: Side) -> usize {
        match side {
            Side::Bid => self.bids.len(),
            Side::Ask => self.asks.len(),
        }
    }

    /// Total number of levels across both sides
    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Check if the ladder is empty
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Clear all levels on both sides
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }

    /// Evict worst-priced levels until `depth(side) <= limit`
    ///
    /// Returns the number of evicted levels. Worst means lowest-priced bids
    /// and highest-priced asks, so the best-priced levels always survive.
    /// O(evicted * log N), no full rescan.
    pub fn enforce_limit(&mut self, side: Side, limit: usize) -> usize {
        match side {
            Side::Bid => evict_last(&mut self.bids, limit),
            Side::Ask => evict_last(&mut self.asks, limit),
        }
    }
}

/// Pop the last (worst) entry until the map is within the limit
fn evict_last<K: Ord>(map: &mut BTreeMap<K, Decimal>, limit: usize) -> usize {
    let mut evicted = 0;
    while map.len() > limit {
        map.pop_last();
        evicted += 1;
    }
    evicted
}
