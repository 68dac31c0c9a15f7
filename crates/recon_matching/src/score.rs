//! Weighted multi-field scoring.
//!
//! For every enabled field the configured comparator runs and the field's
//! weight is accumulated:
//!
//! - MATCH: weight counts toward both the total and the achieved weight
//! - MISMATCH: weight counts toward the total only
//! - MISSING on a required field: weight counts toward the total only
//! - MISSING on an optional field: reported, but excluded from the total
//! - absent on both sides of an optional field: not compared at all
//!
//! The score is `achieved / total`, or 0 when no weight was accumulated.

use std::collections::HashMap;
use std::sync::Arc;

use recon_core::types::{TradeField, TradeRecord};

use crate::compare::{FieldComparator, FieldComparisonResult, Verdict};
use crate::criteria::MatchingCriteria;

/// Per-field comparator overrides keyed by field.
pub(crate) type ComparatorOverrides = HashMap<TradeField, Arc<dyn FieldComparator>>;

/// Weighted score for one candidate pair with its field comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    /// `achieved_weight / total_weight`, in `[0, 1]`
    pub score: f64,
    /// Weight of every field that took part in scoring
    pub total_weight: f64,
    /// Weight of fields whose verdict was MATCH
    pub achieved_weight: f64,
    /// Number of enabled required fields
    pub required_fields: usize,
    /// Number of enabled required fields that matched
    pub required_matched: usize,
    /// Comparisons in criteria order
    pub comparisons: Vec<FieldComparisonResult>,
}

impl ScoreCard {
    /// True when required fields are configured and none of them matched.
    pub fn no_required_overlap(&self) -> bool {
        self.required_fields > 0 && self.required_matched == 0
    }
}

/// Scores `source` against `target` with the built-in rule of each field.
///
/// ```
/// use recon_core::types::{SourceType, TradeField, TradeRecord};
/// use recon_matching::{score, MatchingCriteria};
///
/// let a = TradeRecord::new("A", SourceType::Bank).with(TradeField::Currency, "USD");
/// let b = TradeRecord::new("B", SourceType::Counterparty).with(TradeField::Currency, "usd");
/// let card = score(&a, &b, &MatchingCriteria::default());
/// // every other required field is missing
/// assert!(card.score > 0.0 && card.score < 1.0);
/// ```
pub fn score(source: &TradeRecord, target: &TradeRecord, criteria: &MatchingCriteria) -> ScoreCard {
    score_with(source, target, criteria, &ComparatorOverrides::new())
}

pub(crate) fn score_with(
    source: &TradeRecord,
    target: &TradeRecord,
    criteria: &MatchingCriteria,
    overrides: &ComparatorOverrides,
) -> ScoreCard {
    let mut total_weight = 0.0;
    let mut achieved_weight = 0.0;
    let mut required_fields = 0;
    let mut required_matched = 0;
    let mut comparisons = Vec::with_capacity(criteria.fields.len());

    for criterion in criteria.enabled_fields() {
        let field = criterion.field;
        let s = source.raw_field(field);
        let t = target.raw_field(field);

        if criterion.required {
            required_fields += 1;
        } else if s.is_none() && t.is_none() {
            continue;
        }

        let result = match overrides.get(&field) {
            Some(comparator) => comparator.compare(field, s, t),
            None => criterion.rule().compare(field, s, t),
        };

        match result.verdict {
            Verdict::Match => {
                total_weight += criterion.weight;
                achieved_weight += criterion.weight;
                if criterion.required {
                    required_matched += 1;
                }
            }
            Verdict::Mismatch => total_weight += criterion.weight,
            Verdict::Missing if criterion.required => total_weight += criterion.weight,
            Verdict::Missing => {}
        }
        comparisons.push(result);
    }

    let score = if total_weight > 0.0 {
        (achieved_weight / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    ScoreCard {
        score,
        total_weight,
        achieved_weight,
        required_fields,
        required_matched,
        comparisons,
    }
}
