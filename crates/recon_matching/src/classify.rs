//! Score classification and HITL routing.
//!
//! | Score | Classification | HITL |
//! |---|---|---|
//! | `>= auto_confirm_threshold` | MATCHED | no |
//! | `>= review_threshold` | PROBABLE_MATCH | yes |
//! | `>= min_score_threshold` | REVIEW_REQUIRED | yes |
//! | below, or NaN | BREAK | yes |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::criteria::MatchingCriteria;
use crate::score::ScoreCard;

/// Outcome of a candidate pair, ordered from least to most favourable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// No credible match; routed to exception handling
    Break,
    /// Weak match needing full review
    ReviewRequired,
    /// Likely match needing confirmation
    ProbableMatch,
    /// Auto-confirmed
    Matched,
}

impl Classification {
    /// Whether a human must look at the pair.
    pub fn requires_hitl(&self) -> bool {
        !matches!(self, Classification::Matched)
    }

    /// Wire name of the classification.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Break => "BREAK",
            Classification::ReviewRequired => "REVIEW_REQUIRED",
            Classification::ProbableMatch => "PROBABLE_MATCH",
            Classification::Matched => "MATCHED",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a score to its classification.
///
/// ```
/// use recon_matching::{classify, Classification, MatchingCriteria};
///
/// let c = MatchingCriteria::default();
/// assert_eq!(classify(0.85, &c), Classification::Matched);
/// assert_eq!(classify(0.80, &c), Classification::ProbableMatch);
/// assert_eq!(classify(0.60, &c), Classification::ReviewRequired);
/// assert_eq!(classify(0.10, &c), Classification::Break);
/// ```
pub fn classify(score: f64, criteria: &MatchingCriteria) -> Classification {
    if score.is_nan() {
        Classification::Break
    } else if score >= criteria.auto_confirm_threshold {
        Classification::Matched
    } else if score >= criteria.review_threshold {
        Classification::ProbableMatch
    } else if score >= criteria.min_score_threshold {
        Classification::ReviewRequired
    } else {
        Classification::Break
    }
}

/// Classifies a score card, forcing BREAK when no required field matched.
pub fn classify_card(card: &ScoreCard, criteria: &MatchingCriteria) -> Classification {
    if card.no_required_overlap() {
        Classification::Break
    } else {
        classify(card.score, criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_inclusive() {
        let c = MatchingCriteria::default();
        assert_eq!(classify(1.0, &c), Classification::Matched);
        assert_eq!(classify(0.70, &c), Classification::ProbableMatch);
        assert_eq!(classify(0.50, &c), Classification::ReviewRequired);
        assert_eq!(classify(0.4999, &c), Classification::Break);
        assert_eq!(classify(0.0, &c), Classification::Break);
    }

    #[test]
    fn test_nan_is_break() {
        assert_eq!(
            classify(f64::NAN, &MatchingCriteria::default()),
            Classification::Break
        );
    }

    #[test]
    fn test_collapsed_thresholds() {
        let c = MatchingCriteria::default().with_thresholds(0.6, 0.6, 0.6);
        assert_eq!(classify(0.6, &c), Classification::Matched);
        assert_eq!(classify(0.59, &c), Classification::Break);
    }

    #[test]
    fn test_hitl_routing() {
        assert!(!Classification::Matched.requires_hitl());
        assert!(Classification::ProbableMatch.requires_hitl());
        assert!(Classification::ReviewRequired.requires_hitl());
        assert!(Classification::Break.requires_hitl());
    }

    #[test]
    fn test_ordering_is_favourability() {
        assert!(Classification::Break < Classification::ReviewRequired);
        assert!(Classification::ReviewRequired < Classification::ProbableMatch);
        assert!(Classification::ProbableMatch < Classification::Matched);
    }

    #[test]
    fn test_card_without_required_overlap_breaks() {
        let card = ScoreCard {
            score: 0.9,
            total_weight: 1.0,
            achieved_weight: 0.9,
            required_fields: 2,
            required_matched: 0,
            comparisons: Vec::new(),
        };
        assert_eq!(
            classify_card(&card, &MatchingCriteria::default()),
            Classification::Break
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Classification::ProbableMatch).unwrap(),
            "\"PROBABLE_MATCH\""
        );
        assert_eq!(Classification::ReviewRequired.to_string(), "REVIEW_REQUIRED");
    }
}
