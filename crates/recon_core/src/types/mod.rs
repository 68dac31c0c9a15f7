//! Core trade, field and currency types.
//!
//! This module provides:
//! - `trade`: `TradeRecord`, `SourceType`, `ProductType`
//! - `field`: `TradeField` and its `FieldType`
//! - `currency`: ISO 4217 currency codes with name/symbol aliases
//! - `error`: `NormalizationError` and `CurrencyError`

pub mod currency;
pub mod error;
pub mod field;
pub mod trade;

pub use currency::Currency;
pub use error::{CurrencyError, NormalizationError};
pub use field::{FieldType, TradeField};
pub use trade::{ProductType, SourceType, TradeRecord, MAX_IDENTIFIER_LEN};
