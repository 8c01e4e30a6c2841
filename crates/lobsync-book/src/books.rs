//! Multi-symbol book management
//!
//! One venue connection usually carries many symbols. A [`BookSet`] owns an
//! independent [`Orderbook`] per symbol, sharing a single strategy value and
//! configuration, and get-or-creates books as payloads name new symbols.
//! Cross-symbol parallelism stays the caller's concern; this type only
//! requires `&mut` access in delivery order per symbol.

use crate::engine::{ApplyOutcome, BookConfig, Orderbook};
use crate::strategy::UpdateStrategy;
use crate::tracker::SequenceTracker;
use lobsync_types::{BookError, BookResult, Symbol};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Independent per-symbol books for one venue
pub struct BookSet<S, T>
where
    S: UpdateStrategy + Clone,
    T: SequenceTracker<Snapshot = S::Snapshot, Update = S::Update> + Default,
{
    /// Books by symbol
    books: HashMap<Symbol, Orderbook<S, T>>,
    /// Strategy template cloned into each new book
    strategy: S,
    /// Configuration applied to each new book
    config: BookConfig,
}

impl<S, T> BookSet<S, T>
where
    S: UpdateStrategy + Clone,
    T: SequenceTracker<Snapshot = S::Snapshot, Update = S::Update> + Default,
{
    /// Create an empty set with one shared configuration
    pub fn new(config: BookConfig, strategy: S) -> BookResult<Self> {
        if config.depth_limit == 0 {
            return Err(BookError::ZeroDepthLimit);
        }
        Ok(Self {
            books: HashMap::new(),
            strategy,
            config,
        })
    }

    /// Get or create the book for a symbol
    fn book_mut(&mut self, symbol: &Symbol) -> BookResult<&mut Orderbook<S, T>> {
        match self.books.entry(symbol.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let book = Orderbook::new(
                    symbol.clone(),
                    self.config,
                    self.strategy.clone(),
                    T::default(),
                )?;
                Ok(entry.insert(book))
            }
        }
    }

    /// Seed (or re-seed) one symbol's book from a snapshot
    pub fn initialize(&mut self, symbol: &Symbol, snapshot: &S::Snapshot) -> BookResult<()> {
        self.book_mut(symbol)?.initialize(snapshot)
    }

    /// Apply an incremental update to one symbol's book
    ///
    /// An unseen symbol gets a fresh uninitialized book, which reports
    /// [`ApplyOutcome::SnapshotRequired`] and joins the resync worklist.
    pub fn apply(&mut self, symbol: &Symbol, update: &S::Update) -> BookResult<ApplyOutcome> {
        self.book_mut(symbol)?.apply(update)
    }

    /// Get one symbol's book for reading
    pub fn book(&self, symbol: &Symbol) -> Option<&Orderbook<S, T>> {
        self.books.get(symbol)
    }

    /// Iterator over all (symbol, book) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Orderbook<S, T>)> {
        self.books.iter()
    }

    /// Iterator over tracked symbols
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.books.keys()
    }

    /// Symbols whose books need a fresh snapshot (the resync worklist)
    pub fn needing_snapshot(&self) -> Vec<&Symbol> {
        self.books
            .iter()
            .filter(|(_, book)| book.needs_snapshot())
            .map(|(symbol, _)| symbol)
            .collect()
    }

    /// Drop one symbol's book, returning it
    pub fn remove(&mut self, symbol: &Symbol) -> Option<Orderbook<S, T>> {
        self.books.remove(symbol)
    }

    /// Number of tracked symbols
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if no symbols are tracked
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
