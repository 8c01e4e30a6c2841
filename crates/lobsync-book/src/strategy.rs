//! Venue payload decoding and size normalization
//!
//! A strategy turns one venue-shaped payload into venue-neutral
//! [`BookDeltas`]. It holds no mutable state, so one value can serve every
//! symbol on a venue.

use lobsync_types::{BookDeltas, BookError, BookResult, ParseError};
use rust_decimal::Decimal;

/// Venue-specific payload decoding
///
/// `parse_update` preserves payload order; duplicate prices within one
/// payload resolve last-write-wins downstream, because the engine applies
/// each delta as an absolute overwrite.
pub trait UpdateStrategy {
    /// Venue snapshot payload
    type Snapshot;
    /// Venue incremental update payload
    type Update;

    /// Decode a snapshot into the book's initial levels
    fn parse_snapshot(&self, snapshot: &Self::Snapshot) -> Result<BookDeltas, ParseError>;

    /// Decode an incremental update into per-side delta lists
    fn parse_update(&self, update: &Self::Update) -> Result<BookDeltas, ParseError>;

    /// Convert a raw size into base units when the book is configured for it
    ///
    /// The default is the inverse-instrument rule of [`normalize_size`];
    /// venues with their own contract arithmetic can override it.
    fn normalize_size(&self, price: Decimal, size: Decimal, normalize: bool) -> BookResult<Decimal> {
        normalize_size(price, size, normalize)
    }
}

/// Convert a quote-denominated size to base units via the level's price
///
/// With `normalize` unset the size passes through unchanged. With it set,
/// the result is `size / price`, and a non-positive price is an error
/// rather than a silently wrong size.
pub fn normalize_size(price: Decimal, size: Decimal, normalize: bool) -> BookResult<Decimal> {
    if !normalize {
        return Ok(size);
    }
    if price <= Decimal::ZERO {
        return Err(BookError::NonPositivePrice { price, size });
    }
    Ok(size / price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_divides_by_price() {
        let normalized = normalize_size(dec!(100), dec!(50), true).unwrap();
        assert_eq!(normalized, dec!(0.5));
    }

    #[test]
    fn test_normalize_disabled_passes_through() {
        let size = normalize_size(dec!(100), dec!(50), false).unwrap();
        assert_eq!(size, dec!(50));

        // Even a bad price is ignored when normalization is off
        let size = normalize_size(dec!(0), dec!(50), false).unwrap();
        assert_eq!(size, dec!(50));
    }

    #[test]
    fn test_normalize_rejects_zero_price() {
        let err = normalize_size(dec!(0), dec!(50), true).unwrap_err();
        assert!(matches!(err, BookError::NonPositivePrice { .. }));
    }

    #[test]
    fn test_normalize_rejects_negative_price() {
        let err = normalize_size(dec!(-1), dec!(50), true).unwrap_err();
        assert!(matches!(err, BookError::NonPositivePrice { .. }));
    }

    #[test]
    fn test_normalize_zero_size() {
        // Removal deltas normalize to zero, not an error
        let size = normalize_size(dec!(100), dec!(0), true).unwrap();
        assert_eq!(size, dec!(0));
    }
}
