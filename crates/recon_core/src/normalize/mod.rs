//! Canonicalisation of raw extracted field values.
//!
//! Every function here is pure, deterministic and idempotent:
//! `normalize(normalize(x).value) == normalize(x)` for every accepted `x`.
//!
//! | Field type | Canonical form |
//! |---|---|
//! | Date | `YYYY-MM-DD` |
//! | Currency | ISO 4217 code; unknown strings pass through flagged low confidence |
//! | Amount | plain decimal, thousands separators, symbols and codes stripped |
//! | Rate | plain decimal fraction (`4.25%` becomes `0.0425`) |
//! | EntityName | lower-case tokens, punctuation stripped, legal suffixes unified |
//! | ProductType | canonical product code |
//! | Code | upper-case alphanumeric tokens joined by `-` |
//! | Identifier | upper-case, whitespace removed |

mod amount;
mod date;
mod entity;

pub use amount::{parse_amount, parse_rate};
pub use date::parse_date;
pub use entity::normalize_entity_name;

use crate::types::{Currency, FieldType, NormalizationError, ProductType};

/// A canonicalised field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Canonical string form
    pub value: String,
    /// Set when the value passed through without being recognised
    pub low_confidence: bool,
}

impl Normalized {
    fn exact(value: String) -> Self {
        Self {
            value,
            low_confidence: false,
        }
    }

    fn unrecognised(value: String) -> Self {
        Self {
            value,
            low_confidence: true,
        }
    }
}

/// Canonicalises `raw` according to `field_type`.
///
/// # Errors
///
/// Returns [`NormalizationError`] when the value is blank or cannot be read
/// as the expected type. Callers in the matching layer treat that as a
/// missing value rather than a failure.
///
/// # Examples
///
/// ```
/// use recon_core::normalize::normalize;
/// use recon_core::types::FieldType;
///
/// assert_eq!(normalize("01/15/2024", FieldType::Date).unwrap().value, "2024-01-15");
/// assert_eq!(normalize("Euro", FieldType::Currency).unwrap().value, "EUR");
/// assert_eq!(normalize("4.25%", FieldType::Rate).unwrap().value, "0.0425");
/// assert_eq!(
///     normalize("Goldman Sachs International, Inc.", FieldType::EntityName).unwrap().value,
///     "goldman sachs intl inc"
/// );
/// assert!(normalize("n/a", FieldType::Amount).is_err());
/// ```
pub fn normalize(raw: &str, field_type: FieldType) -> Result<Normalized, NormalizationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NormalizationError::Empty(field_type));
    }

    match field_type {
        FieldType::Date => {
            parse_date(trimmed).map(|d| Normalized::exact(d.format("%Y-%m-%d").to_string()))
        }
        FieldType::Amount => parse_amount(trimmed).map(|v| Normalized::exact(format_decimal(v))),
        FieldType::Rate => parse_rate(trimmed).map(|v| Normalized::exact(format_decimal(v))),
        FieldType::Currency => Ok(normalize_currency(trimmed)),
        FieldType::EntityName => {
            let name = normalize_entity_name(trimmed);
            if name.is_empty() {
                Err(NormalizationError::Empty(field_type))
            } else {
                Ok(Normalized::exact(name))
            }
        }
        FieldType::ProductType => normalize_product(trimmed),
        FieldType::Code => {
            let code = upper_tokens(trimmed).join("-");
            if code.is_empty() {
                Err(NormalizationError::Empty(field_type))
            } else {
                Ok(Normalized::exact(code))
            }
        }
        FieldType::Identifier => Ok(Normalized::exact(
            trimmed
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase(),
        )),
    }
}

/// Formats a finite decimal without exponent, shortest round-trip form.
fn format_decimal(value: f64) -> String {
    format!("{}", value)
}

fn normalize_currency(trimmed: &str) -> Normalized {
    match Currency::from_alias(trimmed) {
        Some(ccy) => Normalized::exact(ccy.code().to_string()),
        None if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) => {
            Normalized::unrecognised(trimmed.to_ascii_uppercase())
        }
        None => Normalized::unrecognised(trimmed.to_string()),
    }
}

fn normalize_product(trimmed: &str) -> Result<Normalized, NormalizationError> {
    if let Some(product) = ProductType::from_alias(trimmed) {
        return Ok(Normalized::exact(product.code().to_string()));
    }
    let code = upper_tokens(trimmed).join("_");
    if code.is_empty() {
        Err(NormalizationError::Empty(FieldType::ProductType))
    } else {
        Ok(Normalized::unrecognised(code))
    }
}

fn upper_tokens(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
        .collect()
}
