//! Example: Replay a captured message tape through a book set
//!
//! Feeds a short Deribit-style tape, including a deliberate sequence gap,
//! and prints the top of book after each message.
//!
//! Run with: cargo run --example replay

use lobsync_book::{ApplyOutcome, BookConfig, Orderbook};
use lobsync_types::Symbol;
use lobsync_venues::deribit::{
    DeribitBookMsg, DeribitBooks, DeribitMsgType, DeribitStrategy, DeribitTracker,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // A captured tape: snapshot, two changes, a gap (change 812 was lost),
    // then the recovery snapshot and a resumed change
    let tape = [
        r#"{"type": "snapshot", "timestamp": 1725000000000, "instrument_name": "BTC-PERPETUAL",
            "change_id": 810,
            "bids": [["new", 50000.0, 10.0], ["new", 49995.0, 4.0]],
            "asks": [["new", 50005.0, 6.0], ["new", 50010.0, 2.0]]}"#,
        r#"{"type": "change", "timestamp": 1725000000050, "prev_change_id": 810,
            "instrument_name": "BTC-PERPETUAL", "change_id": 811,
            "bids": [["change", 50000.0, 12.0]], "asks": []}"#,
        r#"{"type": "change", "timestamp": 1725000000150, "prev_change_id": 812,
            "instrument_name": "BTC-PERPETUAL", "change_id": 813,
            "bids": [["delete", 49995.0, 0.0]], "asks": []}"#,
        r#"{"type": "snapshot", "timestamp": 1725000000300, "instrument_name": "BTC-PERPETUAL",
            "change_id": 820,
            "bids": [["new", 50001.0, 9.0]],
            "asks": [["new", 50006.0, 5.0]]}"#,
        r#"{"type": "change", "timestamp": 1725000000350, "prev_change_id": 820,
            "instrument_name": "BTC-PERPETUAL", "change_id": 821,
            "bids": [["new", 50002.0, 1.5]], "asks": []}"#,
    ];

    println!("=== Orderbook Tape Replay ===\n");

    let mut books = DeribitBooks::new(BookConfig::with_depth(10), DeribitStrategy)?;

    for raw in tape {
        let msg: DeribitBookMsg = serde_json::from_str(raw)?;
        let symbol = Symbol::from(msg.instrument_name.as_str());

        match msg.msg_type {
            DeribitMsgType::Snapshot => {
                books.initialize(&symbol, &msg)?;
                println!("[SNAPSHOT] {} seeded at change {}", symbol, msg.change_id);
            }
            DeribitMsgType::Change => match books.apply(&symbol, &msg)? {
                ApplyOutcome::Applied => {
                    println!("[CHANGE]   {} applied change {}", symbol, msg.change_id);
                }
                ApplyOutcome::Stale => {
                    println!("[CHANGE]   {} dropped stale change {}", symbol, msg.change_id);
                }
                ApplyOutcome::SnapshotRequired => {
                    println!(
                        "[GAP]      {} lost continuity before change {}, awaiting snapshot",
                        symbol, msg.change_id
                    );
                }
            },
        }

        if let Some(book) = books.book(&symbol) {
            print_top(book);
        }
    }

    println!("\n=== Final Summary ===");
    for (symbol, book) in books.iter() {
        let synced = if book.is_synced() { "SYNCED" } else { "DESYNCED" };
        println!(
            "{}: {} bids / {} asks, spread={:?} [{}]",
            symbol,
            book.bid_count(),
            book.ask_count(),
            book.spread(),
            synced
        );
    }

    Ok(())
}

fn print_top(book: &Orderbook<DeribitStrategy, DeribitTracker>) {
    let bid = book.best_bid().map(|l| (l.price, l.size));
    let ask = book.best_ask().map(|l| (l.price, l.size));
    println!("           top: bid={:?} ask={:?}", bid, ask);
}
