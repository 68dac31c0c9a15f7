//! # recon_core: Foundation Types for OTC Confirmation Matching
//!
//! ## Layer 1 (Foundation) Role
//!
//! recon_core is the bottom layer of the reconciliation workspace, providing:
//! - Trade records as extracted from bank and counterparty confirmations (`types::trade`)
//! - The comparable field model: `TradeField`, `FieldType` (`types::field`)
//! - Currency codes with name/symbol aliases (`types::currency`)
//! - Error types: `NormalizationError`, `CurrencyError` (`types::error`)
//! - Value canonicalisation for dates, amounts, rates, currencies and entity names (`normalize`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates, with minimal external dependencies:
//! - chrono: Date parsing and arithmetic
//! - serde: Deserialising trade records supplied by extraction
//! - thiserror: Error derivation
//!
//! ## Usage Examples
//!
//! ```rust
//! use recon_core::normalize::normalize;
//! use recon_core::types::{Currency, FieldType};
//!
//! let date = normalize("15 January 2024", FieldType::Date).unwrap();
//! assert_eq!(date.value, "2024-01-15");
//!
//! let amount = normalize("USD 1,000,000.00", FieldType::Amount).unwrap();
//! assert_eq!(amount.value, "1000000");
//!
//! assert_eq!(Currency::from_alias("US Dollars"), Some(Currency::USD));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod normalize;
pub mod types;

pub use normalize::{normalize, Normalized};
pub use types::{
    Currency, FieldType, NormalizationError, ProductType, SourceType, TradeField, TradeRecord,
};
