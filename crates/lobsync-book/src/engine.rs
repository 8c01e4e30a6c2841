//! Orderbook engine and state machine
//!
//! Binds a [`Ladder`], a [`SequenceTracker`] and an [`UpdateStrategy`] into
//! one per-symbol book that survives gaps, stale deliveries and malformed
//! payloads without ever exposing a partially applied ladder.
//!
//! # State Machine
//!
//! ```text
//! Uninitialized → Synced ↔ Desynchronized
//! ```
//!
//! Only `initialize` enters `Synced`. A gap verdict or an undecodable diff
//! drops to `Desynchronized` and clears ladder and tracker together; the
//! caller must then feed a fresh snapshot. There is no terminal state.

use crate::ladder::Ladder;
use crate::strategy::UpdateStrategy;
use crate::tracker::{SequenceTracker, Verdict};
use lobsync_types::{BookError, BookResult, PriceLevel, Side, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Book synchronization state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookState {
    /// No snapshot processed yet
    #[default]
    Uninitialized,
    /// Processing diffs normally
    Synced,
    /// Continuity lost; waiting for a fresh snapshot
    Desynchronized,
}

/// Result of applying one incremental update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Deltas were applied and the tracker advanced
    Applied,
    /// Update was older than tracked state; discarded
    Stale,
    /// Book is not synced; feed a snapshot before further diffs
    SnapshotRequired,
}

/// Per-book configuration, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookConfig {
    /// Maximum retained levels per side
    pub depth_limit: usize,
    /// Convert quote-denominated sizes to base units (inverse instruments)
    pub normalize_sizes: bool,
    /// Consecutive desyncs tolerated before the hard resubscribe error
    pub max_desyncs: u32,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            depth_limit: 10,
            normalize_sizes: false,
            max_desyncs: 3,
        }
    }
}

impl BookConfig {
    /// Default configuration with a specific depth limit
    pub fn with_depth(depth_limit: usize) -> Self {
        Self {
            depth_limit,
            ..Self::default()
        }
    }
}

/// Managed per-symbol orderbook
///
/// The tracker and strategy are chosen at construction time and share the
/// venue's snapshot/update payload types. Updates for one book must arrive
/// in delivery order from a single caller; books for different symbols are
/// fully independent.
pub struct Orderbook<S, T>
where
    S: UpdateStrategy,
    T: SequenceTracker<Snapshot = S::Snapshot, Update = S::Update>,
{
    /// Symbol this book mirrors
    symbol: Symbol,
    /// Price level storage, both sides
    ladder: Ladder,
    /// Venue payload decoding
    strategy: S,
    /// Sequence continuity rule
    tracker: T,
    /// Construction-time configuration
    config: BookConfig,
    /// Current synchronization state
    state: BookState,
    /// Desyncs since the last successfully applied diff
    desync_streak: u32,
}

impl<S, T> Orderbook<S, T>
where
    S: UpdateStrategy,
    T: SequenceTracker<Snapshot = S::Snapshot, Update = S::Update>,
{
    /// Create a new book in the `Uninitialized` state
    pub fn new(
        symbol: impl Into<Symbol>,
        config: BookConfig,
        strategy: S,
        tracker: T,
    ) -> BookResult<Self> {
        if config.depth_limit == 0 {
            return Err(BookError::ZeroDepthLimit);
        }
        Ok(Self {
            symbol: symbol.into(),
            ladder: Ladder::new(),
            strategy,
            tracker,
            config,
            state: BookState::Uninitialized,
            desync_streak: 0,
        })
    }

    /// Seed the book from a snapshot
    ///
    /// Fully replaces any existing ladder and tracker state, so it is
    /// idempotent and safe to call redundantly after a gap. On a decode or
    /// normalization error the book is left cleared and `Uninitialized`.
    ///
    /// The desync streak is deliberately not reset here: only a
    /// successfully applied diff proves the feed healthy. Use [`reset`]
    /// after an actual re-subscribe.
    ///
    /// [`reset`]: Orderbook::reset
    pub fn initialize(&mut self, snapshot: &S::Snapshot) -> BookResult<()> {
        self.ladder.clear();
        self.tracker.clear();
        self.state = BookState::Uninitialized;

        let deltas = self
            .strategy
            .parse_snapshot(snapshot)
            .map_err(|source| BookError::Malformed {
                symbol: self.symbol.clone(),
                source,
            })?;
        let bids = self.normalize_side(&deltas.bids)?;
        let asks = self.normalize_side(&deltas.asks)?;

        self.apply_levels(Side::Bid, &bids);
        self.apply_levels(Side::Ask, &asks);
        self.tracker.initialize(snapshot);
        self.state = BookState::Synced;

        info!(
            "Initialized book for {} ({} bids / {} asks)",
            self.symbol,
            self.ladder.depth(Side::Bid),
            self.ladder.depth(Side::Ask)
        );
        Ok(())
    }

    /// Apply one incremental update
    ///
    /// The update either fully applies to both sides or the book is
    /// cleared; a partial ladder is never observable. Returns
    /// [`BookError::Resubscribe`] once gap/decode resets accumulate past
    /// `max_desyncs` without a successfully applied diff in between.
    pub fn apply(&mut self, update: &S::Update) -> BookResult<ApplyOutcome> {
        // Diffs are meaningless without a synced baseline. The book is
        // already cleared in this state, so the streak does not grow.
        if self.state != BookState::Synced {
            return Ok(ApplyOutcome::SnapshotRequired);
        }

        // Judge continuity before touching anything.
        match self.tracker.validate(update) {
            Verdict::Stale => {
                debug!("Discarding stale update for {}", self.symbol);
                return Ok(ApplyOutcome::Stale);
            }
            Verdict::Gap => {
                warn!("Sequence gap for {}, clearing book", self.symbol);
                return self.desync();
            }
            Verdict::Accept => {}
        }

        // An undecodable diff is handled like a gap: partial application
        // risk outweighs salvage value.
        let deltas = match self.strategy.parse_update(update) {
            Ok(deltas) => deltas,
            Err(err) => {
                warn!(
                    "Undecodable update for {} ({}), clearing book",
                    self.symbol, err
                );
                return self.desync();
            }
        };

        // Normalize every delta up front so the ladder mutation below
        // cannot fail halfway through.
        let bids = self.normalize_side(&deltas.bids);
        let asks = self.normalize_side(&deltas.asks);
        let (bids, asks) = match (bids, asks) {
            (Ok(bids), Ok(asks)) => (bids, asks),
            (Err(err), _) | (_, Err(err)) => {
                warn!(
                    "Normalization failed for {} ({}), clearing book",
                    self.symbol, err
                );
                self.reset_to_desync();
                return Err(err);
            }
        };

        self.apply_levels(Side::Bid, &bids);
        self.apply_levels(Side::Ask, &asks);
        self.tracker.advance(update);
        self.desync_streak = 0;
        Ok(ApplyOutcome::Applied)
    }

    /// Return the book to `Uninitialized` with a zero desync streak
    ///
    /// For use after an actual re-subscribe, when the old streak no longer
    /// describes the new feed.
    pub fn reset(&mut self) {
        self.ladder.clear();
        self.tracker.clear();
        self.state = BookState::Uninitialized;
        self.desync_streak = 0;
    }

    /// Gap path: atomic reset, streak accounting, hard error past the limit
    fn desync(&mut self) -> BookResult<ApplyOutcome> {
        self.reset_to_desync();
        self.desync_streak += 1;
        if self.desync_streak > self.config.max_desyncs {
            return Err(BookError::Resubscribe {
                symbol: self.symbol.clone(),
                failures: self.desync_streak,
            });
        }
        Ok(ApplyOutcome::SnapshotRequired)
    }

    /// Clear ladder and tracker together so neither can be observed
    /// cleared without the other
    fn reset_to_desync(&mut self) {
        self.ladder.clear();
        self.tracker.clear();
        self.state = BookState::Desynchronized;
    }

    /// Normalize one side's deltas without touching the ladder
    fn normalize_side(&self, levels: &[PriceLevel]) -> BookResult<Vec<PriceLevel>> {
        levels
            .iter()
            .map(|level| {
                self.strategy
                    .normalize_size(level.price, level.size, self.config.normalize_sizes)
                    .map(|size| PriceLevel::new(level.price, size))
            })
            .collect()
    }

    /// Upsert one side's deltas in payload order, then bound its depth
    fn apply_levels(&mut self, side: Side, levels: &[PriceLevel]) {
        for level in levels {
            self.ladder.upsert(side, level.price, level.size);
        }
        self.ladder.enforce_limit(side, self.config.depth_limit);
    }

    // === Read access ===

    /// Get the symbol
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the current state
    pub fn state(&self) -> BookState {
        self.state
    }

    /// Check if the book is synchronized
    pub fn is_synced(&self) -> bool {
        self.state == BookState::Synced
    }

    /// Check if the book needs a snapshot before diffs can apply
    pub fn needs_snapshot(&self) -> bool {
        self.state != BookState::Synced
    }

    /// Get the configured depth limit
    pub fn depth_limit(&self) -> usize {
        self.config.depth_limit
    }

    /// Check if sizes are converted to base units on the way in
    pub fn normalizes_sizes(&self) -> bool {
        self.config.normalize_sizes
    }

    /// Desyncs since the last successfully applied diff
    pub fn consecutive_desyncs(&self) -> u32 {
        self.desync_streak
    }

    /// Get the best bid
    pub fn best_bid(&self) -> Option<PriceLevel> {
        self.ladder.best_bid()
    }

    /// Get the best ask
    pub fn best_ask(&self) -> Option<PriceLevel> {
        self.ladder.best_ask()
    }

    /// Get the spread (ask - bid)
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// Get the mid price ((ask + bid) / 2)
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some((ask.price + bid.price) / Decimal::TWO),
            _ => None,
        }
    }

    /// Number of bid levels
    pub fn bid_count(&self) -> usize {
        self.ladder.depth(Side::Bid)
    }

    /// Number of ask levels
    pub fn ask_count(&self) -> usize {
        self.ladder.depth(Side::Ask)
    }

    /// Iterator over bid levels (best to worst)
    pub fn bids(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.ladder.bids()
    }

    /// Iterator over ask levels (best to worst)
    pub fn asks(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.ladder.asks()
    }

    /// Get the top N bids
    pub fn top_bids(&self, n: usize) -> Vec<PriceLevel> {
        self.ladder.top(Side::Bid, n)
    }

    /// Get the top N asks
    pub fn top_asks(&self, n: usize) -> Vec<PriceLevel> {
        self.ladder.top(Side::Ask, n)
    }

    /// Capture the current ladder as a serializable snapshot
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            bids: self.ladder.side_vec(Side::Bid),
            asks: self.ladder.side_vec(Side::Ask),
            state: self.state,
        }
    }
}

/// Immutable copy of a book's ladder at one instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// Symbol the book mirrors
    pub symbol: Symbol,
    /// Bid levels, best to worst
    pub bids: Vec<PriceLevel>,
    /// Ask levels, best to worst
    pub asks: Vec<PriceLevel>,
    /// State at capture time
    #[serde(skip)]
    pub state: BookState,
}

impl BookSnapshot {
    /// Get the best bid price
    pub fn best_bid_price(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    /// Get the best ask price
    pub fn best_ask_price(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    /// Get the spread
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_ask_price(), self.best_bid_price()) {
            (Some(ask), Some(bid)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Get the mid price
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_ask_price(), self.best_bid_price()) {
            (Some(ask), Some(bid)) => Some((ask + bid) / Decimal::TWO),
            _ => None,
        }
    }
}
