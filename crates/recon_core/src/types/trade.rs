//! Trade records as produced by confirmation extraction.
//!
//! A [`TradeRecord`] is one party's view of a transaction. Economic
//! attributes are kept as the raw strings the extraction step produced;
//! the normaliser turns them into comparable values at match time, so a
//! single unreadable field never prevents a record from being loaded.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::currency::Currency;
use super::field::{FieldType, TradeField};
use crate::normalize::normalize;

/// Maximum length of a UTI/USI value.
pub const MAX_IDENTIFIER_LEN: usize = 52;

/// Which party a confirmation came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    /// The bank's own booking
    #[serde(alias = "bank", alias = "Bank")]
    Bank,
    /// The counterparty's confirmation
    #[serde(alias = "counterparty", alias = "Counterparty")]
    Counterparty,
}

impl SourceType {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Bank => "BANK",
            SourceType::Counterparty => "COUNTERPARTY",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical OTC product classification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    /// Interest rate swap
    Swap,
    /// Cross-currency swap
    CrossCurrencySwap,
    /// Option on a swap
    Swaption,
    /// Forward contract
    Forward,
    /// FX forward
    FxForward,
    /// Vanilla option
    Option,
    /// Exchange-style future
    Future,
    /// Credit default swap
    CreditDefaultSwap,
    /// Commodity swap
    CommoditySwap,
}

impl ProductType {
    /// Canonical upper-case code.
    pub fn code(&self) -> &'static str {
        match self {
            ProductType::Swap => "SWAP",
            ProductType::CrossCurrencySwap => "CROSS_CURRENCY_SWAP",
            ProductType::Swaption => "SWAPTION",
            ProductType::Forward => "FORWARD",
            ProductType::FxForward => "FX_FORWARD",
            ProductType::Option => "OPTION",
            ProductType::Future => "FUTURE",
            ProductType::CreditDefaultSwap => "CREDIT_DEFAULT_SWAP",
            ProductType::CommoditySwap => "COMMODITY_SWAP",
        }
    }

    /// Resolves a product from its code or a common free-text description.
    ///
    /// ```
    /// use recon_core::types::ProductType;
    ///
    /// assert_eq!(ProductType::from_alias("Interest Rate Swap"), Some(ProductType::Swap));
    /// assert_eq!(ProductType::from_alias("FX Fwd"), Some(ProductType::FxForward));
    /// assert_eq!(ProductType::from_alias("exotic basket"), None);
    /// ```
    pub fn from_alias(raw: &str) -> Option<ProductType> {
        let key = raw
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let product = match key.as_str() {
            "swap" | "irs" | "interest rate swap" | "ir swap" | "vanilla swap"
            | "fixed float swap" | "ois" | "overnight index swap" => ProductType::Swap,
            "cross currency swap" | "ccs" | "xccy swap" | "ccy swap" => {
                ProductType::CrossCurrencySwap
            }
            "swaption" | "swap option" => ProductType::Swaption,
            "forward" | "fwd" | "forward contract" | "equity forward" => ProductType::Forward,
            "fx forward" | "fx fwd" | "fxfwd" | "currency forward" | "outright forward" => {
                ProductType::FxForward
            }
            "option" | "opt" | "vanilla option" | "equity option" | "fx option" => {
                ProductType::Option
            }
            "future" | "futures" => ProductType::Future,
            "credit default swap" | "cds" => ProductType::CreditDefaultSwap,
            "commodity swap" | "commodity" => ProductType::CommoditySwap,
            _ => {
                let code = key.to_uppercase().replace(' ', "_");
                return [
                    ProductType::Swap,
                    ProductType::CrossCurrencySwap,
                    ProductType::Swaption,
                    ProductType::Forward,
                    ProductType::FxForward,
                    ProductType::Option,
                    ProductType::Future,
                    ProductType::CreditDefaultSwap,
                    ProductType::CommoditySwap,
                ]
                .into_iter()
                .find(|p| p.code() == code);
            }
        };
        Some(product)
    }
}

/// One party's view of an OTC transaction.
///
/// Read-only to the matching layer. `trade_id` is local to the source
/// system; `uti`/`usi`, when present on both sides, decide identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    /// Source-local trade identifier
    pub trade_id: String,
    /// Which party produced this record
    pub source_type: SourceType,
    /// Unique Trade Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uti: Option<String>,
    /// Unique Swap Identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usi: Option<String>,
    /// Trade date as extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_date: Option<String>,
    /// Effective date as extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    /// Termination date as extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<String>,
    /// Notional amount as extracted (numbers are accepted and kept as text)
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub notional_amount: Option<String>,
    /// Currency code or name as extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Product type as extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    /// Counterparty legal name as extracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_name: Option<String>,
    /// Fixed rate (swaps)
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub fixed_rate: Option<String>,
    /// Floating index (swaps)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_index: Option<String>,
    /// Strike (options)
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub strike: Option<String>,
    /// Commodity underlying (commodity products)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commodity_type: Option<String>,
}

/// Accepts either a JSON string or a JSON number and keeps it as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
    }))
}

impl TradeRecord {
    /// Creates an empty record for the given source.
    pub fn new(trade_id: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            trade_id: trade_id.into(),
            source_type,
            uti: None,
            usi: None,
            trade_date: None,
            effective_date: None,
            termination_date: None,
            notional_amount: None,
            currency: None,
            product_type: None,
            counterparty_name: None,
            fixed_rate: None,
            floating_index: None,
            strike: None,
            commodity_type: None,
        }
    }

    /// Sets a field value, returning the updated record.
    ///
    /// ```
    /// use recon_core::types::{SourceType, TradeField, TradeRecord};
    ///
    /// let trade = TradeRecord::new("B-1", SourceType::Bank)
    ///     .with(TradeField::Currency, "USD")
    ///     .with(TradeField::NotionalAmount, "1,000,000");
    /// assert_eq!(trade.raw_field(TradeField::Currency), Some("USD"));
    /// ```
    pub fn with(mut self, field: TradeField, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    /// Clears a field value, returning the updated record.
    pub fn without(mut self, field: TradeField) -> Self {
        *self.slot_mut(field) = None;
        self
    }

    fn slot_mut(&mut self, field: TradeField) -> &mut Option<String> {
        match field {
            TradeField::Uti => &mut self.uti,
            TradeField::Usi => &mut self.usi,
            TradeField::TradeDate => &mut self.trade_date,
            TradeField::EffectiveDate => &mut self.effective_date,
            TradeField::TerminationDate => &mut self.termination_date,
            TradeField::NotionalAmount => &mut self.notional_amount,
            TradeField::Currency => &mut self.currency,
            TradeField::ProductType => &mut self.product_type,
            TradeField::CounterpartyName => &mut self.counterparty_name,
            TradeField::FixedRate => &mut self.fixed_rate,
            TradeField::FloatingIndex => &mut self.floating_index,
            TradeField::Strike => &mut self.strike,
            TradeField::CommodityType => &mut self.commodity_type,
        }
    }

    /// Raw value of `field`, trimmed; `None` when absent or blank.
    pub fn raw_field(&self, field: TradeField) -> Option<&str> {
        let slot = match field {
            TradeField::Uti => &self.uti,
            TradeField::Usi => &self.usi,
            TradeField::TradeDate => &self.trade_date,
            TradeField::EffectiveDate => &self.effective_date,
            TradeField::TerminationDate => &self.termination_date,
            TradeField::NotionalAmount => &self.notional_amount,
            TradeField::Currency => &self.currency,
            TradeField::ProductType => &self.product_type,
            TradeField::CounterpartyName => &self.counterparty_name,
            TradeField::FixedRate => &self.fixed_rate,
            TradeField::FloatingIndex => &self.floating_index,
            TradeField::Strike => &self.strike,
            TradeField::CommodityType => &self.commodity_type,
        };
        slot.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Reports violations of the record invariants.
    ///
    /// Matching never rejects a record; callers use this to log or route
    /// suspicious extractions. An empty list means the record is clean.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.trade_id.trim().is_empty() {
            issues.push("tradeId is empty".to_string());
        }

        if let Some(raw) = self.raw_field(TradeField::NotionalAmount) {
            match normalize(raw, FieldType::Amount) {
                Ok(n) => match n.value.parse::<f64>() {
                    Ok(v) if v > 0.0 => {}
                    _ => issues.push(format!("notionalAmount must be positive, got '{}'", raw)),
                },
                Err(e) => issues.push(format!("notionalAmount: {}", e)),
            }
        }

        if let Some(raw) = self.raw_field(TradeField::Currency) {
            if let Ok(n) = normalize(raw, FieldType::Currency) {
                if !Currency::is_iso_shaped(&n.value) {
                    issues.push(format!("currency '{}' is not a 3-letter ISO code", raw));
                }
            }
        }

        let date = |field: TradeField| {
            self.raw_field(field)
                .and_then(|raw| normalize(raw, FieldType::Date).ok())
                .map(|n| n.value)
        };
        // Canonical YYYY-MM-DD strings order the same way as the dates.
        if let (Some(trade), Some(effective)) =
            (date(TradeField::TradeDate), date(TradeField::EffectiveDate))
        {
            if effective < trade {
                issues.push(format!(
                    "effectiveDate {} precedes tradeDate {}",
                    effective, trade
                ));
            }
        }
        if let (Some(effective), Some(termination)) = (
            date(TradeField::EffectiveDate),
            date(TradeField::TerminationDate),
        ) {
            if termination < effective {
                issues.push(format!(
                    "terminationDate {} precedes effectiveDate {}",
                    termination, effective
                ));
            }
        }

        for field in [TradeField::Uti, TradeField::Usi] {
            if let Some(id) = self.raw_field(field) {
                if id.len() > MAX_IDENTIFIER_LEN
                    || !id.chars().all(|c| c.is_ascii_alphanumeric())
                {
                    issues.push(format!(
                        "{} '{}' must be alphanumeric and at most {} characters",
                        field.label(),
                        id,
                        MAX_IDENTIFIER_LEN
                    ));
                }
            }
        }

        issues
    }
}
