//! Venue-agnostic orderbook maintenance engine
//!
//! This crate keeps an in-memory mirror of a venue's bid/ask ladder
//! consistent under a stream of incremental updates. It knows nothing about
//! any wire format or transport; payloads arrive already deserialized and
//! are interpreted through two seams chosen per venue at construction time:
//!
//! - [`SequenceTracker`] decides whether an update continues the feed,
//!   repeats old state, or proves messages were missed
//! - [`UpdateStrategy`] decodes a venue payload into neutral price deltas
//!
//! The [`Orderbook`] engine composes both with a depth-limited [`Ladder`]
//! and guarantees the ladder is never left partially updated: every inbound
//! diff either fully applies to both sides or the book clears itself and
//! asks for a fresh snapshot.
//!
//! # Example
//!
//! ```
//! use lobsync_book::Ladder;
//! use lobsync_types::Side;
//! use rust_decimal_macros::dec;
//!
//! let mut ladder = Ladder::new();
//! ladder.upsert(Side::Bid, dec!(100), dec!(1));
//! ladder.upsert(Side::Bid, dec!(99.5), dec!(3));
//! assert_eq!(ladder.best_bid().map(|l| l.price), Some(dec!(100)));
//! ```

pub mod books;
pub mod engine;
pub mod ladder;
pub mod strategy;
pub mod tracker;

#[cfg(test)]
mod testutil;

// Re-export main types
pub use books::BookSet;
pub use engine::{ApplyOutcome, BookConfig, BookSnapshot, BookState, Orderbook};
pub use ladder::Ladder;
pub use strategy::{normalize_size, UpdateStrategy};
pub use tracker::{SequenceTracker, Verdict};
