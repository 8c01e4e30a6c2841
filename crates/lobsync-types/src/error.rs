//! Error types for book maintenance

use crate::symbol::Symbol;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error raised while parsing a venue payload into book deltas
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required field was absent from the payload
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A field could not be read as a decimal
    #[error("Bad decimal in {field}: {value}")]
    BadDecimal { field: &'static str, value: String },

    /// The payload carried an action this venue does not define
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The payload kind does not fit the operation (e.g. a diff handed
    /// to snapshot initialization)
    #[error("Expected {expected} message, got {got}")]
    WrongKind { expected: &'static str, got: String },

    /// A level arrived with a negative size
    #[error("Negative size {size} at price {price}")]
    NegativeSize { price: Decimal, size: Decimal },

    /// The payload carried no book content at all
    #[error("Empty payload")]
    EmptyPayload,
}

/// Main error type for book operations
#[derive(Error, Debug)]
pub enum BookError {
    // === Payload Errors ===
    /// An update payload could not be parsed
    #[error("Malformed update for {symbol}: {source}")]
    Malformed {
        symbol: Symbol,
        #[source]
        source: ParseError,
    },

    /// Size normalization hit a non-positive price
    #[error("Cannot normalize size {size} at non-positive price {price}")]
    NonPositivePrice { price: Decimal, size: Decimal },

    // === Sync Errors ===
    /// Too many consecutive desyncs, the feed itself is suspect
    #[error("Resubscribe required for {symbol}: {failures} consecutive sync failures")]
    Resubscribe { symbol: Symbol, failures: u32 },

    // === Configuration Errors ===
    /// Depth limit of zero would make every book permanently empty
    #[error("Depth limit must be at least 1")]
    ZeroDepthLimit,
}

impl BookError {
    /// Returns true if recovery needs a fresh subscription, not just a snapshot
    pub fn requires_resubscribe(&self) -> bool {
        matches!(self, Self::Resubscribe { .. })
    }

    /// Returns true if the book can keep running after this error
    ///
    /// Recoverable errors leave the book desynchronized; a new snapshot
    /// restores it. Non-recoverable errors need operator action.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Malformed { .. } | Self::NonPositivePrice { .. } => true,
            Self::Resubscribe { .. } | Self::ZeroDepthLimit => false,
        }
    }

    /// Create a malformed-update error
    pub fn malformed(symbol: impl Into<Symbol>, source: ParseError) -> Self {
        Self::Malformed {
            symbol: symbol.into(),
            source,
        }
    }
}

/// Result type alias for book operations
pub type BookResult<T> = Result<T, BookError>;
