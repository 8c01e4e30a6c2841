//! Shared types for exchange-agnostic order book maintenance
//!
//! This crate provides the core type definitions used across lobsync.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Symbol`] - Instrument symbols as the venue spells them
//! - [`PriceLevel`] - A price level with decimal precision
//! - [`Side`] - Bid or ask
//! - [`BookDeltas`] - Venue-neutral parsed payload content
//! - [`BookError`], [`ParseError`] - Error types

pub mod deltas;
pub mod error;
pub mod level;
pub mod side;
pub mod symbol;

// Re-export commonly used types
pub use deltas::*;
pub use error::*;
pub use level::*;
pub use side::*;
pub use symbol::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
