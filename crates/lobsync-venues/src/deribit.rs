//! Deribit-style venue adapter
//!
//! A contiguous-id venue: every change message carries a `change_id` and
//! the `prev_change_id` it follows, so continuity holds exactly when
//! `prev_change_id` equals the last applied `change_id`. Snapshots and
//! changes arrive through one message shape, told apart by `type`.
//!
//! Inverse-settled instruments on this venue quote sizes in the quote
//! currency; construct their books with `normalize_sizes = true` so the
//! engine converts to base units on the way in.

use lobsync_book::{BookSet, Orderbook, SequenceTracker, UpdateStrategy, Verdict};
use lobsync_types::{deserialize_decimal, BookDeltas, ParseError, PriceLevel};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Per-symbol book wired for this venue
pub type DeribitBook = Orderbook<DeribitStrategy, DeribitTracker>;

/// Multi-symbol book set wired for this venue
pub type DeribitBooks = BookSet<DeribitStrategy, DeribitTracker>;

// ============================================================================
// Wire Types
// ============================================================================

/// Kind of book message the venue sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeribitMsgType {
    /// Full book state, seeding or replacing the book
    Snapshot,
    /// Incremental change set
    Change,
}

impl DeribitMsgType {
    /// Wire name of this message kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Change => "change",
        }
    }
}

/// Level action within a change triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeribitAction {
    /// Level created
    New,
    /// Level size changed
    Change,
    /// Level removed (the venue echoes amount 0)
    Delete,
}

/// One `[action, price, amount]` change triple
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeribitChange(
    pub DeribitAction,
    #[serde(deserialize_with = "deserialize_decimal")] pub Decimal,
    #[serde(deserialize_with = "deserialize_decimal")] pub Decimal,
);

/// Book message, covering both the snapshot and change kinds
#[derive(Debug, Clone, Deserialize)]
pub struct DeribitBookMsg {
    /// Instrument the message describes
    pub instrument_name: String,
    /// Message kind
    #[serde(rename = "type")]
    pub msg_type: DeribitMsgType,
    /// Venue timestamp in milliseconds
    pub timestamp: u64,
    /// Id of this change set
    pub change_id: u64,
    /// Id of the preceding change set; absent on snapshots
    #[serde(default)]
    pub prev_change_id: Option<u64>,
    /// Bid changes in payload order
    #[serde(default)]
    pub bids: Vec<DeribitChange>,
    /// Ask changes in payload order
    #[serde(default)]
    pub asks: Vec<DeribitChange>,
}

// ============================================================================
// Strategy
// ============================================================================

/// Decodes `[action, price, amount]` triples into book deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct DeribitStrategy;

impl DeribitStrategy {
    fn parse_changes(changes: &[DeribitChange]) -> Result<Vec<PriceLevel>, ParseError> {
        changes
            .iter()
            .map(|DeribitChange(action, price, amount)| {
                if *amount < Decimal::ZERO {
                    return Err(ParseError::NegativeSize {
                        price: *price,
                        size: *amount,
                    });
                }
                let size = match action {
                    DeribitAction::Delete => Decimal::ZERO,
                    DeribitAction::New | DeribitAction::Change => *amount,
                };
                Ok(PriceLevel::new(*price, size))
            })
            .collect()
    }

    fn parse(msg: &DeribitBookMsg) -> Result<BookDeltas, ParseError> {
        Ok(BookDeltas::new(
            Self::parse_changes(&msg.bids)?,
            Self::parse_changes(&msg.asks)?,
        ))
    }
}

impl UpdateStrategy for DeribitStrategy {
    type Snapshot = DeribitBookMsg;
    type Update = DeribitBookMsg;

    /// Snapshot decoding refuses change-typed messages: seeding a book from
    /// a diff would fabricate a baseline mid-stream
    fn parse_snapshot(&self, snapshot: &DeribitBookMsg) -> Result<BookDeltas, ParseError> {
        if snapshot.msg_type != DeribitMsgType::Snapshot {
            return Err(ParseError::WrongKind {
                expected: "snapshot",
                got: snapshot.msg_type.as_str().to_string(),
            });
        }
        Self::parse(snapshot)
    }

    fn parse_update(&self, update: &DeribitBookMsg) -> Result<BookDeltas, ParseError> {
        Self::parse(update)
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// Contiguous-id continuity rule
///
/// Accept exactly when `prev_change_id` equals the last applied
/// `change_id`. Anything at or below the baseline is stale. Everything
/// else, including snapshot-typed messages (which carry no prev id and so
/// cannot prove continuity), is a gap.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeribitTracker {
    last_id: Option<u64>,
}

impl SequenceTracker for DeribitTracker {
    type Snapshot = DeribitBookMsg;
    type Update = DeribitBookMsg;

    fn initialize(&mut self, snapshot: &DeribitBookMsg) {
        self.last_id = Some(snapshot.change_id);
    }

    fn validate(&self, update: &DeribitBookMsg) -> Verdict {
        let last = match self.last_id {
            Some(last) => last,
            None => return Verdict::Gap,
        };
        if update.change_id <= last {
            return Verdict::Stale;
        }
        match update.prev_change_id {
            Some(prev) if prev == last => Verdict::Accept,
            _ => Verdict::Gap,
        }
    }

    fn advance(&mut self, update: &DeribitBookMsg) {
        self.last_id = Some(update.change_id);
    }

    fn clear(&mut self) {
        self.last_id = None;
    }

    fn is_initialized(&self) -> bool {
        self.last_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobsync_book::BookConfig;
    use rust_decimal_macros::dec;

    fn snapshot_msg(change_id: u64, bids: Vec<DeribitChange>, asks: Vec<DeribitChange>) -> DeribitBookMsg {
        DeribitBookMsg {
            instrument_name: "BTC-PERPETUAL".to_string(),
            msg_type: DeribitMsgType::Snapshot,
            timestamp: 1554373911000,
            change_id,
            prev_change_id: None,
            bids,
            asks,
        }
    }

    fn change_msg(
        change_id: u64,
        prev_change_id: u64,
        bids: Vec<DeribitChange>,
        asks: Vec<DeribitChange>,
    ) -> DeribitBookMsg {
        DeribitBookMsg {
            instrument_name: "BTC-PERPETUAL".to_string(),
            msg_type: DeribitMsgType::Change,
            timestamp: 1554373911330,
            change_id,
            prev_change_id: Some(prev_change_id),
            bids,
            asks,
        }
    }

    #[test]
    fn test_change_msg_deserializes() {
        let json = r#"{
            "type": "change",
            "timestamp": 1554373911330,
            "prev_change_id": 297217,
            "instrument_name": "BTC-PERPETUAL",
            "change_id": 297218,
            "bids": [["new", 5041.94, 10.0], ["delete", 5042.34, 0.0]],
            "asks": []
        }"#;
        let msg: DeribitBookMsg = serde_json::from_str(json).unwrap();

        assert_eq!(msg.msg_type, DeribitMsgType::Change);
        assert_eq!(msg.change_id, 297218);
        assert_eq!(msg.prev_change_id, Some(297217));
        assert_eq!(msg.bids.len(), 2);
        assert_eq!(msg.bids[0].0, DeribitAction::New);
        assert_eq!(msg.bids[0].1, dec!(5041.94));
        assert_eq!(msg.bids[0].2, dec!(10.0));
        assert_eq!(msg.bids[1].0, DeribitAction::Delete);
    }

    #[test]
    fn test_snapshot_msg_deserializes() {
        let json = r#"{
            "type": "snapshot",
            "timestamp": 1554373911000,
            "instrument_name": "BTC-PERPETUAL",
            "change_id": 297217,
            "bids": [["new", 5042.34, 30.0]],
            "asks": [["new", 5042.64, 20.0]]
        }"#;
        let msg: DeribitBookMsg = serde_json::from_str(json).unwrap();

        assert_eq!(msg.msg_type, DeribitMsgType::Snapshot);
        assert_eq!(msg.prev_change_id, None);
        assert_eq!(msg.asks[0].1, dec!(5042.64));
    }

    #[test]
    fn test_action_mapping() {
        let msg = change_msg(
            2,
            1,
            vec![
                DeribitChange(DeribitAction::New, dec!(100), dec!(5)),
                DeribitChange(DeribitAction::Change, dec!(99), dec!(7)),
                DeribitChange(DeribitAction::Delete, dec!(98), dec!(0)),
            ],
            vec![],
        );
        let deltas = DeribitStrategy.parse_update(&msg).unwrap();

        assert_eq!(deltas.bids[0], PriceLevel::new(dec!(100), dec!(5)));
        assert_eq!(deltas.bids[1], PriceLevel::new(dec!(99), dec!(7)));
        // Delete maps to a zero-size removal delta
        assert_eq!(deltas.bids[2], PriceLevel::new(dec!(98), dec!(0)));
    }

    #[test]
    fn test_delete_ignores_echoed_amount() {
        // Some feeds echo the removed amount instead of zero
        let msg = change_msg(
            2,
            1,
            vec![DeribitChange(DeribitAction::Delete, dec!(98), dec!(12))],
            vec![],
        );
        let deltas = DeribitStrategy.parse_update(&msg).unwrap();
        assert_eq!(deltas.bids[0].size, dec!(0));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let msg = change_msg(
            2,
            1,
            vec![DeribitChange(DeribitAction::Change, dec!(100), dec!(-3))],
            vec![],
        );
        let err = DeribitStrategy.parse_update(&msg).unwrap_err();
        assert!(matches!(err, ParseError::NegativeSize { .. }));
    }

    #[test]
    fn test_parse_snapshot_rejects_change_msg() {
        let msg = change_msg(2, 1, vec![], vec![]);
        let err = DeribitStrategy.parse_snapshot(&msg).unwrap_err();
        assert!(matches!(
            err,
            ParseError::WrongKind {
                expected: "snapshot",
                ..
            }
        ));
    }

    #[test]
    fn test_tracker_verdicts() {
        let mut tracker = DeribitTracker::default();

        // No baseline yet
        assert_eq!(tracker.validate(&change_msg(2, 1, vec![], vec![])), Verdict::Gap);
        assert!(!tracker.is_initialized());

        tracker.initialize(&snapshot_msg(100, vec![], vec![]));
        assert!(tracker.is_initialized());

        // Exact continuation
        assert_eq!(
            tracker.validate(&change_msg(101, 100, vec![], vec![])),
            Verdict::Accept
        );
        // At or below the baseline
        assert_eq!(
            tracker.validate(&change_msg(100, 99, vec![], vec![])),
            Verdict::Stale
        );
        assert_eq!(
            tracker.validate(&change_msg(95, 94, vec![], vec![])),
            Verdict::Stale
        );
        // Ahead but not contiguous
        assert_eq!(
            tracker.validate(&change_msg(105, 104, vec![], vec![])),
            Verdict::Gap
        );

        tracker.advance(&change_msg(101, 100, vec![], vec![]));
        assert_eq!(
            tracker.validate(&change_msg(102, 101, vec![], vec![])),
            Verdict::Accept
        );

        tracker.clear();
        assert!(!tracker.is_initialized());
        assert_eq!(
            tracker.validate(&change_msg(102, 101, vec![], vec![])),
            Verdict::Gap
        );
    }

    #[test]
    fn test_tracker_snapshot_msg_is_gap() {
        let mut tracker = DeribitTracker::default();
        tracker.initialize(&snapshot_msg(100, vec![], vec![]));

        // A fresh snapshot mid-stream has no prev id; it must route through
        // initialize, not apply
        let resnap = snapshot_msg(140, vec![], vec![]);
        assert_eq!(tracker.validate(&resnap), Verdict::Gap);
    }

    #[test]
    fn test_duplicate_prices_last_write_wins() {
        let mut book = DeribitBook::new(
            "BTC-PERPETUAL",
            BookConfig::default(),
            DeribitStrategy,
            DeribitTracker::default(),
        )
        .unwrap();

        book.initialize(&snapshot_msg(
            1,
            vec![DeribitChange(DeribitAction::New, dec!(100), dec!(1))],
            vec![],
        ))
        .unwrap();

        // Same price twice in one payload: the later entry wins
        book.apply(&change_msg(
            2,
            1,
            vec![
                DeribitChange(DeribitAction::Change, dec!(100), dec!(3)),
                DeribitChange(DeribitAction::Change, dec!(100), dec!(7)),
            ],
            vec![],
        ))
        .unwrap();

        assert_eq!(book.best_bid(), Some(PriceLevel::new(dec!(100), dec!(7))));
        assert_eq!(book.bid_count(), 1);
    }

    #[test]
    fn test_inverse_instrument_normalization() {
        let config = BookConfig {
            normalize_sizes: true,
            ..BookConfig::default()
        };
        let mut book = DeribitBook::new(
            "BTC-PERPETUAL",
            config,
            DeribitStrategy,
            DeribitTracker::default(),
        )
        .unwrap();

        // 50 USD of contracts at 100 USD/BTC is 0.5 BTC
        book.initialize(&snapshot_msg(
            1,
            vec![DeribitChange(DeribitAction::New, dec!(100), dec!(50))],
            vec![],
        ))
        .unwrap();

        assert_eq!(book.best_bid(), Some(PriceLevel::new(dec!(100), dec!(0.5))));
    }
}
