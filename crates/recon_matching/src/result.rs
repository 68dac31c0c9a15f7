//! Match decisions returned to callers.
//!
//! These values are immutable outputs. Updating a trade's match status in a
//! store, or opening an exception case for a HITL result, is left to the
//! caller.

use recon_core::types::TradeRecord;
use serde::{Deserialize, Serialize};

use crate::classify::Classification;
use crate::compare::FieldComparisonResult;
use crate::report::Discrepancy;

/// What decided a pair's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchBasis {
    /// Both sides carried a UTI
    Uti,
    /// Both sides carried a USI and at least one lacked a UTI
    Usi,
    /// Weighted field comparison
    Weighted,
}

impl MatchBasis {
    /// Wire name of the basis.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchBasis::Uti => "UTI",
            MatchBasis::Usi => "USI",
            MatchBasis::Weighted => "WEIGHTED",
        }
    }
}

/// Decision for one candidate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Source (usually bank) trade id
    pub source_trade_id: String,
    /// Target (usually counterparty) trade id
    pub target_trade_id: String,
    /// Confidence in `[0, 1]`
    pub score: f64,
    /// Classification of the score
    pub classification: Classification,
    /// Whether a human must review the pair
    #[serde(rename = "requiresHITL")]
    pub requires_hitl: bool,
    /// What decided the score
    pub basis: MatchBasis,
    /// Field comparisons in evaluation order
    pub field_comparisons: Vec<FieldComparisonResult>,
    /// MISMATCH and MISSING comparisons in evaluation order
    pub discrepancies: Vec<Discrepancy>,
    /// Other targets that scored exactly as well as the chosen one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ambiguous_targets: Vec<String>,
}

impl MatchResult {
    /// True when other targets tied with the chosen one.
    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguous_targets.is_empty()
    }

    /// Records tied targets; an ambiguous result always needs review.
    pub(crate) fn with_ambiguity(mut self, tied: Vec<String>) -> Self {
        if !tied.is_empty() {
            self.requires_hitl = true;
        }
        self.ambiguous_targets = tied;
        self
    }
}

/// Outcome of matching two pools of trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// One result per paired source, in source order
    pub matches: Vec<MatchResult>,
    /// Sources with no eligible target, in input order
    pub unmatched_sources: Vec<TradeRecord>,
    /// Targets never selected, in input order
    pub unmatched_targets: Vec<TradeRecord>,
}

impl BatchOutcome {
    /// Results that must go to the exception workflow.
    pub fn hitl_queue(&self) -> impl Iterator<Item = &MatchResult> {
        self.matches.iter().filter(|m| m.requires_hitl)
    }

    /// Counts per outcome.
    pub fn summary(&self) -> BatchSummary {
        let count = |c: Classification| {
            self.matches
                .iter()
                .filter(|m| m.classification == c)
                .count()
        };
        BatchSummary {
            matched: count(Classification::Matched),
            probable_match: count(Classification::ProbableMatch),
            review_required: count(Classification::ReviewRequired),
            requires_hitl: self.hitl_queue().count(),
            unmatched_sources: self.unmatched_sources.len(),
            unmatched_targets: self.unmatched_targets.len(),
        }
    }
}

/// Per-classification counts of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// MATCHED pairs
    pub matched: usize,
    /// PROBABLE_MATCH pairs
    pub probable_match: usize,
    /// REVIEW_REQUIRED pairs
    pub review_required: usize,
    /// Pairs needing human review
    pub requires_hitl: usize,
    /// Sources left unpaired
    pub unmatched_sources: usize,
    /// Targets left unpaired
    pub unmatched_targets: usize,
}
