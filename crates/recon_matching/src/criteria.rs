//! Matching criteria: the per-run field table and decision thresholds.
//!
//! Criteria are plain data, deserialisable from TOML:
//!
//! ```toml
//! auto_confirm_threshold = 0.85
//! review_threshold = 0.70
//! min_score_threshold = 0.50
//!
//! [[fields]]
//! field = "notional_amount"
//! weight = 0.3
//! required = true
//! tolerance = 0.01
//!
//! [[fields]]
//! field = "counterparty_name"
//! weight = 0.2
//! similarity = 0.85
//! ```
//!
//! Omitted keys take the defaults of [`MatchingCriteria::default`]. The
//! order of `fields` is the evaluation order and the order of discrepancy
//! reports.

use std::collections::HashSet;

use recon_core::types::{FieldType, TradeField};
use serde::{Deserialize, Serialize};

use crate::compare::MatchRule;
use crate::error::ConfigurationError;

/// Default score at or above which a pair is auto-confirmed.
pub const DEFAULT_AUTO_CONFIRM_THRESHOLD: f64 = 0.85;
/// Default score at or above which a pair is a probable match.
pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.70;
/// Default floor below which a candidate is not worth surfacing.
pub const DEFAULT_MIN_SCORE_THRESHOLD: f64 = 0.50;
/// Default token-set similarity for entity name fields.
pub const DEFAULT_NAME_SIMILARITY: f64 = 0.85;

fn default_enabled() -> bool {
    true
}

/// Configuration of one field in the weighted comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCriterion {
    /// Field being compared
    pub field: TradeField,
    /// Disabled fields are neither compared nor weighted
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Relative weight, normalised by the total enabled weight
    pub weight: f64,
    /// Required fields count against the score when missing
    #[serde(default)]
    pub required: bool,
    /// Relative tolerance for amounts and rates; day window for dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    /// Minimum token-set similarity for fuzzy string comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl FieldCriterion {
    /// Creates an enabled, optional criterion with no tolerance.
    pub fn new(field: TradeField, weight: f64) -> Self {
        Self {
            field,
            enabled: true,
            weight,
            required: false,
            tolerance: None,
            similarity: None,
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Disables the field.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Sets the tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Sets the fuzzy similarity threshold.
    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = Some(similarity);
        self
    }

    /// Comparison rule implied by the field type and the configured
    /// tolerance/similarity.
    ///
    /// | Field type | Rule |
    /// |---|---|
    /// | Amount, Rate | `NumericTolerance(tolerance or 0)` |
    /// | EntityName | `FuzzyString(similarity or 0.85)` |
    /// | Date | `DateWindow(tolerance days)` when tolerance >= 1, else `Exact` |
    /// | others | `FuzzyString(similarity)` when set, else `Exact` |
    pub fn rule(&self) -> MatchRule {
        match self.field.field_type() {
            FieldType::Amount | FieldType::Rate => {
                MatchRule::NumericTolerance(self.tolerance.unwrap_or(0.0))
            }
            FieldType::EntityName => {
                MatchRule::FuzzyString(self.similarity.unwrap_or(DEFAULT_NAME_SIMILARITY))
            }
            FieldType::Date => match self.tolerance {
                Some(days) if days >= 1.0 => MatchRule::DateWindow(days.floor() as u32),
                _ => MatchRule::Exact,
            },
            _ => match self.similarity {
                Some(similarity) => MatchRule::FuzzyString(similarity),
                None => MatchRule::Exact,
            },
        }
    }
}

/// Per-reconciliation-run settings.
///
/// Shared read-only across a run; the engine never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingCriteria {
    /// Score at or above which a pair is MATCHED
    pub auto_confirm_threshold: f64,
    /// Score at or above which a pair is PROBABLE_MATCH
    pub review_threshold: f64,
    /// Score below which a pair is BREAK and never selected as a candidate
    pub min_score_threshold: f64,
    /// Ordered field table
    pub fields: Vec<FieldCriterion>,
}

impl Default for MatchingCriteria {
    fn default() -> Self {
        Self {
            auto_confirm_threshold: DEFAULT_AUTO_CONFIRM_THRESHOLD,
            review_threshold: DEFAULT_REVIEW_THRESHOLD,
            min_score_threshold: DEFAULT_MIN_SCORE_THRESHOLD,
            fields: vec![
                FieldCriterion::new(TradeField::TradeDate, 0.15).required(),
                FieldCriterion::new(TradeField::EffectiveDate, 0.05),
                FieldCriterion::new(TradeField::TerminationDate, 0.10),
                FieldCriterion::new(TradeField::NotionalAmount, 0.25)
                    .required()
                    .with_tolerance(0.0001),
                FieldCriterion::new(TradeField::Currency, 0.15).required(),
                FieldCriterion::new(TradeField::ProductType, 0.10),
                FieldCriterion::new(TradeField::CounterpartyName, 0.15)
                    .required()
                    .with_similarity(DEFAULT_NAME_SIMILARITY),
                FieldCriterion::new(TradeField::FixedRate, 0.05).with_tolerance(0.0001),
                FieldCriterion::new(TradeField::FloatingIndex, 0.05).disabled(),
                FieldCriterion::new(TradeField::Strike, 0.05)
                    .with_tolerance(0.0001)
                    .disabled(),
                FieldCriterion::new(TradeField::CommodityType, 0.05).disabled(),
            ],
        }
    }
}

impl MatchingCriteria {
    /// Exact economics, every date required, tight name similarity.
    pub fn strict() -> Self {
        Self {
            auto_confirm_threshold: 0.95,
            review_threshold: 0.85,
            min_score_threshold: 0.70,
            fields: vec![
                FieldCriterion::new(TradeField::TradeDate, 0.15).required(),
                FieldCriterion::new(TradeField::EffectiveDate, 0.05).required(),
                FieldCriterion::new(TradeField::TerminationDate, 0.10).required(),
                FieldCriterion::new(TradeField::NotionalAmount, 0.25)
                    .required()
                    .with_tolerance(0.0),
                FieldCriterion::new(TradeField::Currency, 0.15).required(),
                FieldCriterion::new(TradeField::ProductType, 0.10).required(),
                FieldCriterion::new(TradeField::CounterpartyName, 0.10)
                    .required()
                    .with_similarity(0.95),
                FieldCriterion::new(TradeField::FixedRate, 0.05).with_tolerance(0.0),
                FieldCriterion::new(TradeField::FloatingIndex, 0.05),
            ],
        }
    }

    /// Wider tolerances for noisy extractions: one-day date windows and
    /// 0.1% notional tolerance.
    pub fn relaxed() -> Self {
        Self {
            auto_confirm_threshold: 0.80,
            review_threshold: 0.60,
            min_score_threshold: 0.40,
            fields: vec![
                FieldCriterion::new(TradeField::TradeDate, 0.15)
                    .required()
                    .with_tolerance(1.0),
                FieldCriterion::new(TradeField::EffectiveDate, 0.05).with_tolerance(1.0),
                FieldCriterion::new(TradeField::TerminationDate, 0.10).with_tolerance(1.0),
                FieldCriterion::new(TradeField::NotionalAmount, 0.25)
                    .required()
                    .with_tolerance(0.001),
                FieldCriterion::new(TradeField::Currency, 0.15).required(),
                FieldCriterion::new(TradeField::ProductType, 0.10),
                FieldCriterion::new(TradeField::CounterpartyName, 0.15).with_similarity(0.75),
                FieldCriterion::new(TradeField::FixedRate, 0.05).with_tolerance(0.001),
            ],
        }
    }

    /// Replaces the field table.
    pub fn with_fields(mut self, fields: Vec<FieldCriterion>) -> Self {
        self.fields = fields;
        self
    }

    /// Replaces the three thresholds.
    pub fn with_thresholds(mut self, auto_confirm: f64, review: f64, min_score: f64) -> Self {
        self.auto_confirm_threshold = auto_confirm;
        self.review_threshold = review;
        self.min_score_threshold = min_score;
        self
    }

    /// Enabled criteria in evaluation order.
    pub fn enabled_fields(&self) -> impl Iterator<Item = &FieldCriterion> {
        self.fields.iter().filter(|c| c.enabled)
    }

    /// Sum of enabled weights.
    pub fn total_enabled_weight(&self) -> f64 {
        self.enabled_fields().map(|c| c.weight).sum()
    }

    /// Parses criteria from TOML and validates them.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        let criteria: Self =
            toml::from_str(text).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
        criteria.validate()?;
        Ok(criteria)
    }

    /// Checks thresholds and the field table.
    ///
    /// Disabled fields are validated too, so a criteria file is either
    /// wholly valid or rejected.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, value) in [
            ("auto_confirm_threshold", self.auto_confirm_threshold),
            ("review_threshold", self.review_threshold),
            ("min_score_threshold", self.min_score_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::ThresholdOutOfRange { name, value });
            }
        }

        if self.min_score_threshold > self.review_threshold
            || self.review_threshold > self.auto_confirm_threshold
        {
            return Err(ConfigurationError::ThresholdOrder {
                min: self.min_score_threshold,
                review: self.review_threshold,
                auto: self.auto_confirm_threshold,
            });
        }

        let mut seen = HashSet::new();
        for criterion in &self.fields {
            let field = criterion.field;
            if !seen.insert(field) {
                return Err(ConfigurationError::DuplicateField(field));
            }
            if field.is_identifier() {
                return Err(ConfigurationError::IdentifierField(field));
            }
            if !criterion.weight.is_finite() {
                return Err(ConfigurationError::NonFiniteWeight(field));
            }
            if criterion.weight < 0.0 {
                return Err(ConfigurationError::NegativeWeight {
                    field,
                    weight: criterion.weight,
                });
            }
            if let Some(tolerance) = criterion.tolerance {
                if !tolerance.is_finite() || tolerance < 0.0 {
                    return Err(ConfigurationError::InvalidTolerance { field, tolerance });
                }
            }
            if let Some(similarity) = criterion.similarity {
                if !(0.0..=1.0).contains(&similarity) {
                    return Err(ConfigurationError::InvalidSimilarity { field, similarity });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_presets_validate() {
        assert!(MatchingCriteria::default().validate().is_ok());
        assert!(MatchingCriteria::strict().validate().is_ok());
        assert!(MatchingCriteria::relaxed().validate().is_ok());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert_relative_eq!(MatchingCriteria::default().total_enabled_weight(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rule_derivation() {
        assert_eq!(
            FieldCriterion::new(TradeField::NotionalAmount, 1.0).with_tolerance(0.01).rule(),
            MatchRule::NumericTolerance(0.01)
        );
        assert_eq!(
            FieldCriterion::new(TradeField::FixedRate, 1.0).rule(),
            MatchRule::NumericTolerance(0.0)
        );
        assert_eq!(
            FieldCriterion::new(TradeField::CounterpartyName, 1.0).rule(),
            MatchRule::FuzzyString(DEFAULT_NAME_SIMILARITY)
        );
        assert_eq!(FieldCriterion::new(TradeField::TradeDate, 1.0).rule(), MatchRule::Exact);
        assert_eq!(
            FieldCriterion::new(TradeField::TradeDate, 1.0).with_tolerance(2.0).rule(),
            MatchRule::DateWindow(2)
        );
        assert_eq!(
            FieldCriterion::new(TradeField::TradeDate, 1.0).with_tolerance(0.5).rule(),
            MatchRule::Exact
        );
        assert_eq!(FieldCriterion::new(TradeField::Currency, 1.0).rule(), MatchRule::Exact);
        assert_eq!(
            FieldCriterion::new(TradeField::FloatingIndex, 1.0).with_similarity(0.9).rule(),
            MatchRule::FuzzyString(0.9)
        );
    }

    #[test]
    fn test_validate_threshold_order() {
        let criteria = MatchingCriteria::default().with_thresholds(0.80, 0.90, 0.5);
        assert_eq!(
            criteria.validate(),
            Err(ConfigurationError::ThresholdOrder {
                min: 0.5,
                review: 0.90,
                auto: 0.80
            })
        );

        let criteria = MatchingCriteria::default().with_thresholds(0.85, 0.70, 0.75);
        assert!(matches!(
            criteria.validate(),
            Err(ConfigurationError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn test_validate_threshold_range() {
        let criteria = MatchingCriteria::default().with_thresholds(1.2, 0.7, 0.5);
        assert!(matches!(
            criteria.validate(),
            Err(ConfigurationError::ThresholdOutOfRange {
                name: "auto_confirm_threshold",
                ..
            })
        ));

        let criteria = MatchingCriteria::default().with_thresholds(0.85, 0.7, f64::NAN);
        assert!(matches!(
            criteria.validate(),
            Err(ConfigurationError::ThresholdOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_field_table() {
        let negative = MatchingCriteria::default()
            .with_fields(vec![FieldCriterion::new(TradeField::Currency, -0.2)]);
        assert!(matches!(
            negative.validate(),
            Err(ConfigurationError::NegativeWeight { .. })
        ));

        let duplicate = MatchingCriteria::default().with_fields(vec![
            FieldCriterion::new(TradeField::Currency, 0.2),
            FieldCriterion::new(TradeField::Currency, 0.3),
        ]);
        assert_eq!(
            duplicate.validate(),
            Err(ConfigurationError::DuplicateField(TradeField::Currency))
        );

        let identifier = MatchingCriteria::default()
            .with_fields(vec![FieldCriterion::new(TradeField::Uti, 1.0)]);
        assert_eq!(
            identifier.validate(),
            Err(ConfigurationError::IdentifierField(TradeField::Uti))
        );

        let tolerance = MatchingCriteria::default().with_fields(vec![FieldCriterion::new(
            TradeField::NotionalAmount,
            1.0,
        )
        .with_tolerance(-0.01)]);
        assert!(matches!(
            tolerance.validate(),
            Err(ConfigurationError::InvalidTolerance { .. })
        ));

        let similarity = MatchingCriteria::default().with_fields(vec![FieldCriterion::new(
            TradeField::CounterpartyName,
            1.0,
        )
        .with_similarity(1.5)]);
        assert!(matches!(
            similarity.validate(),
            Err(ConfigurationError::InvalidSimilarity { .. })
        ));

        let infinite = MatchingCriteria::default()
            .with_fields(vec![FieldCriterion::new(TradeField::Strike, f64::INFINITY)]);
        assert_eq!(
            infinite.validate(),
            Err(ConfigurationError::NonFiniteWeight(TradeField::Strike))
        );
    }

    #[test]
    fn test_zero_weight_table_is_valid() {
        let criteria = MatchingCriteria::default()
            .with_fields(vec![FieldCriterion::new(TradeField::Currency, 0.0)]);
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_from_toml_with_defaults() {
        let criteria = MatchingCriteria::from_toml_str("review_threshold = 0.6").unwrap();
        assert_relative_eq!(criteria.review_threshold, 0.6);
        assert_relative_eq!(criteria.auto_confirm_threshold, DEFAULT_AUTO_CONFIRM_THRESHOLD);
        assert_eq!(criteria.fields, MatchingCriteria::default().fields);
    }

    #[test]
    fn test_from_toml_field_table() {
        let text = r#"
            auto_confirm_threshold = 0.9

            [[fields]]
            field = "notional_amount"
            weight = 0.6
            required = true
            tolerance = 0.01

            [[fields]]
            field = "counterparty_name"
            weight = 0.4
            similarity = 0.8
            enabled = false
        "#;
        let criteria = MatchingCriteria::from_toml_str(text).unwrap();
        assert_eq!(criteria.fields.len(), 2);
        assert_eq!(criteria.fields[0].field, TradeField::NotionalAmount);
        assert!(criteria.fields[0].required);
        assert!(criteria.fields[0].enabled);
        assert_eq!(criteria.fields[0].tolerance, Some(0.01));
        assert!(!criteria.fields[1].enabled);
        assert_eq!(criteria.enabled_fields().count(), 1);
    }

    #[test]
    fn test_from_toml_rejects_bad_input() {
        assert!(matches!(
            MatchingCriteria::from_toml_str("review_threshold = \"high\""),
            Err(ConfigurationError::Parse(_))
        ));
        assert!(matches!(
            MatchingCriteria::from_toml_str("[[fields]]\nfield = \"notional\"\nweight = 1.0"),
            Err(ConfigurationError::Parse(_))
        ));
        assert!(matches!(
            MatchingCriteria::from_toml_str("review_threshold = 0.95"),
            Err(ConfigurationError::ThresholdOrder { .. })
        ));
    }
}
