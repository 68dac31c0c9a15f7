//! Matching configuration errors.
//!
//! Configuration is validated once, before any pair is scored. A
//! `ConfigurationError` aborts the whole call; per-field problems are never
//! reported through this type.

use recon_core::types::TradeField;
use thiserror::Error;

/// Invalid [`MatchingCriteria`](crate::MatchingCriteria).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A field weight is below zero.
    #[error("Negative weight for field {field}: {weight}")]
    NegativeWeight {
        /// Offending field
        field: TradeField,
        /// Configured weight
        weight: f64,
    },

    /// A field weight is NaN or infinite.
    #[error("Non-finite weight for field {0}")]
    NonFiniteWeight(TradeField),

    /// A threshold lies outside [0, 1].
    #[error("{name} must lie within [0, 1], got {value}")]
    ThresholdOutOfRange {
        /// Threshold name
        name: &'static str,
        /// Configured value
        value: f64,
    },

    /// Thresholds are not ordered `min <= review <= auto_confirm`.
    #[error(
        "Thresholds out of order: min_score_threshold ({min}) <= review_threshold ({review}) \
         <= auto_confirm_threshold ({auto}) is required"
    )]
    ThresholdOrder {
        /// Minimum score threshold
        min: f64,
        /// Review threshold
        review: f64,
        /// Auto-confirm threshold
        auto: f64,
    },

    /// A tolerance is negative or non-finite.
    #[error("Invalid tolerance for field {field}: {tolerance}")]
    InvalidTolerance {
        /// Offending field
        field: TradeField,
        /// Configured tolerance
        tolerance: f64,
    },

    /// A fuzzy similarity threshold lies outside [0, 1].
    #[error("Similarity threshold for field {field} must lie within [0, 1], got {similarity}")]
    InvalidSimilarity {
        /// Offending field
        field: TradeField,
        /// Configured similarity
        similarity: f64,
    },

    /// The same field appears twice in the field table.
    #[error("Field {0} is configured more than once")]
    DuplicateField(TradeField),

    /// UTI/USI decide identity directly and cannot carry a weight.
    #[error("Identifier field {0} cannot be weighted")]
    IdentifierField(TradeField),

    /// Criteria text could not be parsed.
    #[error("Criteria parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_threshold_order() {
        let err = ConfigurationError::ThresholdOrder {
            min: 0.5,
            review: 0.9,
            auto: 0.85,
        };
        let msg = err.to_string();
        assert!(msg.contains("review_threshold (0.9)"));
        assert!(msg.contains("auto_confirm_threshold (0.85)"));
    }

    #[test]
    fn test_error_display_negative_weight() {
        let err = ConfigurationError::NegativeWeight {
            field: TradeField::NotionalAmount,
            weight: -0.1,
        };
        assert_eq!(err.to_string(), "Negative weight for field notional_amount: -0.1");
    }

    #[test]
    fn test_error_is_error_trait() {
        let err: Box<dyn std::error::Error> =
            Box::new(ConfigurationError::DuplicateField(TradeField::Currency));
        assert!(err.to_string().contains("more than once"));
    }
}
