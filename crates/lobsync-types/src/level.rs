//! Price level types with decimal precision

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// A single price level in the orderbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price of this level
    #[serde(deserialize_with = "deserialize_decimal")]
    pub price: Decimal,
    /// Size resting at this price level
    #[serde(deserialize_with = "deserialize_decimal")]
    pub size: Decimal,
}

impl PriceLevel {
    /// Create a new price level
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }

    /// Create a level from f64 values (for testing)
    pub fn from_f64(price: f64, size: f64) -> Self {
        use rust_decimal::prelude::FromPrimitive;
        Self {
            price: Decimal::from_f64(price).unwrap_or_default(),
            size: Decimal::from_f64(size).unwrap_or_default(),
        }
    }

    /// Check if this level carries no liquidity (should be removed)
    pub fn is_dead(&self) -> bool {
        self.size <= Decimal::ZERO
    }
}

/// CRITICAL: Custom deserializer to preserve decimal precision
/// Venues that send JSON numbers would lose precision through f64
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use rust_decimal::prelude::FromPrimitive;
    use serde::de::Error;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Decimal::from_str(&s).map_err(D::Error::custom),
        StringOrNumber::Number(n) => {
            // First try to parse the string representation
            let s = n.to_string();
            // Handle scientific notation (e.g., 5e-6) by using f64 conversion
            if s.contains('e') || s.contains('E') {
                let f = n.as_f64().ok_or_else(|| D::Error::custom("invalid number"))?;
                Decimal::from_f64(f).ok_or_else(|| D::Error::custom("cannot convert to decimal"))
            } else {
                Decimal::from_str(&s).map_err(D::Error::custom)
            }
        }
    }
}
