//! Best-candidate selection over a scored row of targets.
//!
//! A target is eligible when it is still in the pool and its pair was not
//! classified BREAK, which excludes scores under the minimum threshold, UTI
//! conflicts and pairs without any required-field overlap. The highest
//! score wins. Among equal scores a pair decided by a shared UTI or USI
//! beats one decided by weighted fields; after that the first target in pool
//! order wins and the others of the same rank are reported as tied.

use crate::classify::Classification;
use crate::result::MatchBasis;

/// Scores closer than this are treated as equal.
pub const TIE_EPSILON: f64 = 1e-9;

/// Lightweight decision for one scored pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairDecision {
    /// Pair score
    pub score: f64,
    /// Pair classification
    pub classification: Classification,
    /// What decided the score
    pub basis: MatchBasis,
}

impl PairDecision {
    /// Whether the pair may be selected at all.
    pub fn is_eligible(&self) -> bool {
        self.classification != Classification::Break && !self.score.is_nan()
    }

    /// True when a shared trade identifier decided the pair.
    pub fn by_identifier(&self) -> bool {
        self.basis != MatchBasis::Weighted
    }

    fn same_score(&self, top: f64) -> bool {
        (self.score - top).abs() <= TIE_EPSILON
    }
}

/// Chosen target index plus the indices of tied runners-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Index of the chosen target
    pub best: usize,
    /// Indices of other eligible targets with an equal score and basis rank,
    /// in pool order
    pub tied: Vec<usize>,
}

/// Picks the best eligible target in `row`, skipping indices marked taken.
///
/// `taken` may be shorter than `row`; missing entries count as available.
pub fn pick_best(row: &[PairDecision], taken: &[bool]) -> Option<Selection> {
    let available = |i: usize| !taken.get(i).copied().unwrap_or(false);

    let mut best: Option<(usize, &PairDecision)> = None;
    for (i, decision) in row.iter().enumerate() {
        if !available(i) || !decision.is_eligible() {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, top)) => {
                decision.score > top.score + TIE_EPSILON
                    || (decision.same_score(top.score)
                        && decision.by_identifier()
                        && !top.by_identifier())
            }
        };
        if better {
            best = Some((i, decision));
        }
    }

    let (best, top) = best?;
    let tied = row
        .iter()
        .enumerate()
        .filter(|&(i, d)| {
            i != best
                && available(i)
                && d.is_eligible()
                && d.same_score(top.score)
                && d.by_identifier() == top.by_identifier()
        })
        .map(|(i, _)| i)
        .collect();

    Some(Selection { best, tied })
}
