//! Venue adapters for the lobsync book engine
//!
//! Each adapter pairs the wire types of one exchange family with an
//! [`UpdateStrategy`](lobsync_book::UpdateStrategy) that decodes them and a
//! [`SequenceTracker`](lobsync_book::SequenceTracker) that judges message
//! continuity. The engine itself never sees venue JSON; these modules are
//! the only place wire shapes live.
//!
//! # Adapters
//!
//! - **Deribit-style** ([`deribit`]): contiguous change ids with an explicit
//!   `prev_change_id` back-pointer; inverse contracts carry quote-denominated
//!   amounts, so books typically run with size normalization on
//! - **Binance-style** ([`binance`]): ranged update ids (`U..=u`) validated
//!   against a REST snapshot's `lastUpdateId`; overlapping ranges are
//!   tolerated per the venue's documented recovery procedure
//!
//! # Differences Between the Two Families
//!
//! | Aspect | Deribit-style | Binance-style |
//! |--------|---------------|---------------|
//! | Snapshot source | First stream message | REST depth endpoint |
//! | Continuity rule | `prev_change_id == last` | `U <= last + 1 < u` |
//! | Stale rule | `change_id <= last` | `u <= last` |
//! | Removal encoding | `delete` action | qty `0` |
//! | Size units | Quote (inverse contracts) | Base |
//!
//! # Example
//!
//! ```
//! use lobsync_book::BookConfig;
//! use lobsync_types::Symbol;
//! use lobsync_venues::binance::{BinanceBooks, BinanceDepthSnapshot, BinanceStrategy};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut books = BinanceBooks::new(BookConfig::with_depth(25), BinanceStrategy)?;
//!     let symbol = Symbol::new("BTCUSDT");
//!
//!     let snapshot: BinanceDepthSnapshot = serde_json::from_str(
//!         r#"{"lastUpdateId": 100, "bids": [["50000", "1.5"]], "asks": [["50001", "2"]]}"#,
//!     )?;
//!     books.initialize(&symbol, &snapshot)?;
//!
//!     let book = books.book(&symbol).unwrap();
//!     assert!(book.is_synced());
//!     Ok(())
//! }
//! ```

pub mod binance;
pub mod deribit;

// Re-export main types
pub use binance::{
    BinanceBook, BinanceBooks, BinanceDepthSnapshot, BinanceDepthUpdate, BinancePair,
    BinanceStrategy, BinanceTracker,
};
pub use deribit::{
    DeribitAction, DeribitBook, DeribitBookMsg, DeribitBooks, DeribitChange, DeribitMsgType,
    DeribitStrategy, DeribitTracker,
};
