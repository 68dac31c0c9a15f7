//! Currency types for confirmation matching.
//!
//! This module provides ISO 4217 currency codes plus a lookup from the
//! free-text currency names and symbols that appear on scanned
//! confirmations.
//!
//! # Examples
//!
//! ```
//! use recon_core::types::currency::Currency;
//!
//! let usd = Currency::USD;
//! assert_eq!(usd.code(), "USD");
//!
//! assert_eq!(Currency::from_alias("Japanese Yen"), Some(Currency::JPY));
//! assert_eq!(Currency::from_alias("€"), Some(Currency::EUR));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CurrencyError;

/// ISO 4217 currency codes.
///
/// Covers the currencies that routinely appear on OTC derivative
/// confirmations. Codes outside this set are still accepted by the
/// normaliser, which passes them through flagged as low confidence.
///
/// # Examples
///
/// ```
/// use recon_core::types::currency::Currency;
///
/// // Parse from string (case-insensitive)
/// let eur: Currency = "eur".parse().unwrap();
/// assert_eq!(eur, Currency::EUR);
/// ```
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// United States Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen (no minor units)
    JPY,
    /// Swiss Franc
    CHF,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// New Zealand Dollar
    NZD,
    /// Hong Kong Dollar
    HKD,
    /// Singapore Dollar
    SGD,
    /// Chinese Renminbi
    CNY,
    /// Swedish Krona
    SEK,
    /// Norwegian Krone
    NOK,
    /// Danish Krone
    DKK,
    /// Indian Rupee
    INR,
    /// South Korean Won (no minor units)
    KRW,
    /// Brazilian Real
    BRL,
    /// Mexican Peso
    MXN,
    /// South African Rand
    ZAR,
}

impl Currency {
    /// All supported currencies, in declaration order.
    pub const ALL: [Currency; 19] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::CAD,
        Currency::AUD,
        Currency::NZD,
        Currency::HKD,
        Currency::SGD,
        Currency::CNY,
        Currency::SEK,
        Currency::NOK,
        Currency::DKK,
        Currency::INR,
        Currency::KRW,
        Currency::BRL,
        Currency::MXN,
        Currency::ZAR,
    ];

    /// Returns the ISO 4217 three-letter currency code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::NZD => "NZD",
            Currency::HKD => "HKD",
            Currency::SGD => "SGD",
            Currency::CNY => "CNY",
            Currency::SEK => "SEK",
            Currency::NOK => "NOK",
            Currency::DKK => "DKK",
            Currency::INR => "INR",
            Currency::KRW => "KRW",
            Currency::BRL => "BRL",
            Currency::MXN => "MXN",
            Currency::ZAR => "ZAR",
        }
    }

    /// Resolves a currency from its code, English name or symbol.
    ///
    /// Matching ignores case, dots and repeated whitespace. Ambiguous symbols
    /// resolve to the most common currency on confirmations (`$` to USD,
    /// `¥` to JPY, `kr` is not resolved).
    ///
    /// ```
    /// use recon_core::types::currency::Currency;
    ///
    /// assert_eq!(Currency::from_alias("U.S. Dollars"), Some(Currency::USD));
    /// assert_eq!(Currency::from_alias("pounds sterling"), Some(Currency::GBP));
    /// assert_eq!(Currency::from_alias("doubloons"), None);
    /// ```
    pub fn from_alias(raw: &str) -> Option<Currency> {
        if let Ok(ccy) = raw.trim().parse::<Currency>() {
            return Some(ccy);
        }

        let key = raw
            .trim()
            .to_lowercase()
            .replace('.', "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let ccy = match key.as_str() {
            "$" | "us$" | "us dollar" | "us dollars" | "united states dollar"
            | "united states dollars" | "dollar" | "dollars" => Currency::USD,
            "€" | "euro" | "euros" => Currency::EUR,
            "£" | "pound" | "pounds" | "pound sterling" | "pounds sterling" | "sterling"
            | "british pound" | "british pounds" => Currency::GBP,
            "¥" | "yen" | "japanese yen" => Currency::JPY,
            "swiss franc" | "swiss francs" | "sfr" => Currency::CHF,
            "c$" | "canadian dollar" | "canadian dollars" => Currency::CAD,
            "a$" | "australian dollar" | "australian dollars" => Currency::AUD,
            "nz$" | "new zealand dollar" | "new zealand dollars" => Currency::NZD,
            "hk$" | "hong kong dollar" | "hong kong dollars" => Currency::HKD,
            "s$" | "singapore dollar" | "singapore dollars" => Currency::SGD,
            "rmb" | "renminbi" | "yuan" | "chinese yuan" | "cnh" => Currency::CNY,
            "swedish krona" | "swedish kronor" => Currency::SEK,
            "norwegian krone" | "norwegian kroner" => Currency::NOK,
            "danish krone" | "danish kroner" => Currency::DKK,
            "₹" | "rupee" | "rupees" | "indian rupee" | "indian rupees" => Currency::INR,
            "₩" | "won" | "korean won" | "south korean won" => Currency::KRW,
            "r$" | "real" | "reais" | "brazilian real" | "brazilian reais" => Currency::BRL,
            "mexican peso" | "mexican pesos" => Currency::MXN,
            "rand" | "south african rand" => Currency::ZAR,
            _ => return None,
        };
        Some(ccy)
    }

    /// Returns true when `code` has the shape of an ISO 4217 code
    /// (three ASCII uppercase letters), whether or not it is supported here.
    pub fn is_iso_shaped(code: &str) -> bool {
        code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    /// Parses ISO 4217 currency code (case-insensitive).
    fn from_str(s: &str) -> Result<Self, CurrencyError> {
        let upper = s.to_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|ccy| ccy.code() == upper)
            .ok_or_else(|| CurrencyError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    /// Formats as ISO 4217 code.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
