//! Comparable trade fields and their value types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a field's raw value is canonicalised before comparison.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Calendar date, canonical form `YYYY-MM-DD`
    Date,
    /// ISO 4217 currency code
    Currency,
    /// Monetary amount, canonical plain decimal
    Amount,
    /// Rate or price; percent strings are converted to fractions
    Rate,
    /// Legal entity name, case-folded with legal suffixes unified
    EntityName,
    /// Product classification, canonical `ProductType` code
    ProductType,
    /// Free code such as a floating index, upper-cased
    Code,
    /// Trade identifier (UTI/USI), upper-cased without whitespace
    Identifier,
}

/// A named field of a [`TradeRecord`](super::TradeRecord) that can be compared
/// between the two sides of a confirmation.
///
/// Declaration order is the default evaluation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeField {
    /// Unique Trade Identifier
    Uti,
    /// Unique Swap Identifier
    Usi,
    /// Trade (execution) date
    TradeDate,
    /// Effective (start) date
    EffectiveDate,
    /// Termination (maturity) date
    TerminationDate,
    /// Notional amount
    NotionalAmount,
    /// Notional currency
    Currency,
    /// Product type
    ProductType,
    /// Counterparty legal name
    CounterpartyName,
    /// Fixed rate of a swap leg
    FixedRate,
    /// Floating rate index
    FloatingIndex,
    /// Option strike
    Strike,
    /// Commodity underlying
    CommodityType,
}

impl TradeField {
    /// Every field, in declaration order.
    pub const ALL: [TradeField; 13] = [
        TradeField::Uti,
        TradeField::Usi,
        TradeField::TradeDate,
        TradeField::EffectiveDate,
        TradeField::TerminationDate,
        TradeField::NotionalAmount,
        TradeField::Currency,
        TradeField::ProductType,
        TradeField::CounterpartyName,
        TradeField::FixedRate,
        TradeField::FloatingIndex,
        TradeField::Strike,
        TradeField::CommodityType,
    ];

    /// Human-readable label used in discrepancy reports.
    pub fn label(&self) -> &'static str {
        match self {
            TradeField::Uti => "UTI",
            TradeField::Usi => "USI",
            TradeField::TradeDate => "Trade Date",
            TradeField::EffectiveDate => "Effective Date",
            TradeField::TerminationDate => "Termination Date",
            TradeField::NotionalAmount => "Notional Amount",
            TradeField::Currency => "Currency",
            TradeField::ProductType => "Product Type",
            TradeField::CounterpartyName => "Counterparty Name",
            TradeField::FixedRate => "Fixed Rate",
            TradeField::FloatingIndex => "Floating Index",
            TradeField::Strike => "Strike",
            TradeField::CommodityType => "Commodity Type",
        }
    }

    /// Stable snake_case key, as used in configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            TradeField::Uti => "uti",
            TradeField::Usi => "usi",
            TradeField::TradeDate => "trade_date",
            TradeField::EffectiveDate => "effective_date",
            TradeField::TerminationDate => "termination_date",
            TradeField::NotionalAmount => "notional_amount",
            TradeField::Currency => "currency",
            TradeField::ProductType => "product_type",
            TradeField::CounterpartyName => "counterparty_name",
            TradeField::FixedRate => "fixed_rate",
            TradeField::FloatingIndex => "floating_index",
            TradeField::Strike => "strike",
            TradeField::CommodityType => "commodity_type",
        }
    }

    /// Value type governing normalisation and the default comparison rule.
    pub fn field_type(&self) -> FieldType {
        match self {
            TradeField::Uti | TradeField::Usi => FieldType::Identifier,
            TradeField::TradeDate | TradeField::EffectiveDate | TradeField::TerminationDate => {
                FieldType::Date
            }
            TradeField::NotionalAmount => FieldType::Amount,
            TradeField::Currency => FieldType::Currency,
            TradeField::ProductType => FieldType::ProductType,
            TradeField::CounterpartyName => FieldType::EntityName,
            TradeField::FixedRate | TradeField::Strike => FieldType::Rate,
            TradeField::FloatingIndex | TradeField::CommodityType => FieldType::Code,
        }
    }

    /// Identifier fields decide identity outright and are never weighted.
    pub fn is_identifier(&self) -> bool {
        self.field_type() == FieldType::Identifier
    }

    /// Whether comparisons of this field carry a numeric difference.
    pub fn is_numeric(&self) -> bool {
        matches!(self.field_type(), FieldType::Amount | FieldType::Rate)
    }
}

impl fmt::Display for TradeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TradeField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        TradeField::ALL
            .iter()
            .copied()
            .find(|field| field.key() == key)
            .ok_or_else(|| format!("Unknown trade field: {}", s))
    }
}
