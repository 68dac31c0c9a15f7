//! Error types for structured error handling.
//!
//! This module provides:
//! - `NormalizationError`: A raw field value could not be canonicalised
//! - `CurrencyError`: Errors from currency code parsing

use thiserror::Error;

use super::field::FieldType;

/// A single raw field value could not be parsed into its expected type.
///
/// Never fatal: the matching layer records the field as MISSING and carries
/// on with the remaining fields of the pair.
///
/// # Examples
/// ```
/// use recon_core::types::NormalizationError;
///
/// let err = NormalizationError::InvalidDate("31/31/2024".to_string());
/// assert_eq!(format!("{}", err), "Unparseable date: 31/31/2024");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    /// Value was empty after trimming.
    #[error("Empty value for {0:?} field")]
    Empty(FieldType),

    /// Value matched none of the accepted date formats.
    #[error("Unparseable date: {0}")]
    InvalidDate(String),

    /// Value is not a finite decimal amount.
    #[error("Unparseable amount: {0}")]
    InvalidAmount(String),

    /// Value is not a finite rate or percentage.
    #[error("Unparseable rate: {0}")]
    InvalidRate(String),
}

/// Currency-related errors.
///
/// # Examples
/// ```
/// use recon_core::types::CurrencyError;
///
/// let err = CurrencyError::UnknownCurrency("XYZ".to_string());
/// assert_eq!(format!("{}", err), "Unknown currency: XYZ");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    /// Unknown currency code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_error_display() {
        let err = NormalizationError::InvalidAmount("abc".to_string());
        assert_eq!(err.to_string(), "Unparseable amount: abc");

        let err = NormalizationError::Empty(FieldType::Date);
        assert_eq!(err.to_string(), "Empty value for Date field");
    }

    #[test]
    fn test_error_is_error_trait() {
        let err: Box<dyn std::error::Error> =
            Box::new(NormalizationError::InvalidRate("x%".to_string()));
        assert!(err.to_string().contains("rate"));
    }
}
