//! Matching entry points.
//!
//! [`MatchingEngine`] holds validated criteria, optional per-field
//! comparator overrides and the parallelism settings. The free functions
//! [`match_pair`], [`select_best_match`] and [`match_batch`] build a
//! default engine for one call.
//!
//! # Identifier fast path
//!
//! When both trades carry a UTI, only the UTIs are compared: equal UTIs give
//! score 1.0 and MATCHED, different UTIs give score 0.0 and BREAK. Failing
//! that, the same rule applies to USIs. Identifiers are compared with
//! whitespace removed and case ignored.
//!
//! # Batch selection
//!
//! Sources are processed in input order. Each takes its best remaining
//! target, which then leaves the pool. At equal score a target sharing the
//! source's UTI or USI is preferred over a weighted match. The pair matrix may be scored in
//! parallel; selection itself is sequential.

use std::sync::Arc;

use recon_core::types::{TradeField, TradeRecord};
use tracing::{debug, info, warn};

use crate::classify::{classify_card, Classification};
use crate::compare::{FieldComparator, FieldComparisonResult, MatchRule, Verdict};
use crate::criteria::MatchingCriteria;
use crate::error::ConfigurationError;
use crate::parallel::{map_rows, ParallelConfig};
use crate::report::build_report;
use crate::result::{BatchOutcome, MatchBasis, MatchResult};
use crate::score::{score_with, ComparatorOverrides};
use crate::select::{pick_best, PairDecision};

/// Scores of one pair before it is turned into a [`MatchResult`].
struct Evaluation {
    basis: MatchBasis,
    score: f64,
    classification: Classification,
    comparisons: Vec<FieldComparisonResult>,
}

impl Evaluation {
    fn decision(&self) -> PairDecision {
        PairDecision {
            score: self.score,
            classification: self.classification,
            basis: self.basis,
        }
    }
}

/// Reusable matcher over one validated set of criteria.
#[derive(Clone)]
pub struct MatchingEngine {
    criteria: MatchingCriteria,
    comparators: ComparatorOverrides,
    parallel: ParallelConfig,
}

impl std::fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut overridden: Vec<_> = self.comparators.keys().copied().collect();
        overridden.sort();
        f.debug_struct("MatchingEngine")
            .field("criteria", &self.criteria)
            .field("comparators", &overridden)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl MatchingEngine {
    /// Validates `criteria` and builds an engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the criteria are invalid.
    pub fn new(criteria: MatchingCriteria) -> Result<Self, ConfigurationError> {
        criteria.validate()?;
        Ok(Self {
            criteria,
            comparators: ComparatorOverrides::new(),
            parallel: ParallelConfig::default(),
        })
    }

    /// Replaces the built-in rule of `field` with `comparator`.
    ///
    /// The field's weight and required flag still come from the criteria.
    pub fn with_comparator<C>(mut self, field: TradeField, comparator: C) -> Self
    where
        C: FieldComparator + 'static,
    {
        self.comparators.insert(field, Arc::new(comparator));
        self
    }

    /// Sets the parallelism used by [`match_batch`](Self::match_batch).
    pub fn with_parallel_config(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Criteria this engine was built with.
    pub fn criteria(&self) -> &MatchingCriteria {
        &self.criteria
    }

    /// Evaluates exactly one candidate pair.
    pub fn match_pair(&self, source: &TradeRecord, target: &TradeRecord) -> MatchResult {
        if source.source_type == target.source_type {
            warn!(
                source = %source.trade_id,
                target = %target.trade_id,
                source_type = %source.source_type,
                "Comparing two trades from the same side"
            );
        }
        self.build_result(source, target, self.evaluate(source, target))
    }

    /// Best target for `source` in `pool`, or `None` when no target is
    /// eligible.
    pub fn select_best_match(
        &self,
        source: &TradeRecord,
        pool: &[TradeRecord],
    ) -> Option<MatchResult> {
        let evaluations: Vec<Evaluation> =
            pool.iter().map(|target| self.evaluate(source, target)).collect();
        let row: Vec<PairDecision> = evaluations.iter().map(Evaluation::decision).collect();
        let selection = pick_best(&row, &[])?;

        let tied = selection
            .tied
            .iter()
            .map(|&i| pool[i].trade_id.clone())
            .collect();
        let evaluation = evaluations.into_iter().nth(selection.best)?;
        Some(
            self.build_result(source, &pool[selection.best], evaluation)
                .with_ambiguity(tied),
        )
    }

    /// Pairs `sources` with `targets` one-to-one.
    ///
    /// An empty target pool is not an error: every source comes back
    /// unmatched.
    pub fn match_batch(&self, sources: &[TradeRecord], targets: &[TradeRecord]) -> BatchOutcome {
        let n_pairs = sources.len().saturating_mul(targets.len());
        info!(
            sources = sources.len(),
            targets = targets.len(),
            parallel = self.parallel.should_parallelize(n_pairs),
            "Starting batch match"
        );
        if sources
            .iter()
            .any(|s| targets.iter().any(|t| t.source_type == s.source_type))
        {
            warn!("Source and target pools share a source type");
        }

        let matrix: Vec<Vec<PairDecision>> = map_rows(sources, n_pairs, &self.parallel, |source| {
            targets
                .iter()
                .map(|target| self.evaluate(source, target).decision())
                .collect()
        });

        let mut taken = vec![false; targets.len()];
        let mut outcome = BatchOutcome::default();

        for (source, row) in sources.iter().zip(&matrix) {
            let Some(selection) = pick_best(row, &taken) else {
                debug!(source = %source.trade_id, "No eligible target");
                outcome.unmatched_sources.push(source.clone());
                continue;
            };
            taken[selection.best] = true;

            let target = &targets[selection.best];
            let tied = selection
                .tied
                .iter()
                .map(|&i| targets[i].trade_id.clone())
                .collect();
            let result = self
                .build_result(source, target, self.evaluate(source, target))
                .with_ambiguity(tied);
            outcome.matches.push(result);
        }

        outcome.unmatched_targets = targets
            .iter()
            .zip(&taken)
            .filter_map(|(target, &t)| (!t).then(|| target.clone()))
            .collect();

        let summary = outcome.summary();
        info!(
            matched = summary.matched,
            probable = summary.probable_match,
            review = summary.review_required,
            hitl = summary.requires_hitl,
            unmatched_sources = summary.unmatched_sources,
            unmatched_targets = summary.unmatched_targets,
            "Batch match complete"
        );
        outcome
    }

    fn evaluate(&self, source: &TradeRecord, target: &TradeRecord) -> Evaluation {
        if let Some(evaluation) = identifier_decision(source, target) {
            return evaluation;
        }
        let card = score_with(source, target, &self.criteria, &self.comparators);
        let classification = classify_card(&card, &self.criteria);
        debug!(
            source = %source.trade_id,
            target = %target.trade_id,
            score = card.score,
            classification = %classification,
            "Scored pair"
        );
        Evaluation {
            basis: MatchBasis::Weighted,
            score: card.score,
            classification,
            comparisons: card.comparisons,
        }
    }

    fn build_result(
        &self,
        source: &TradeRecord,
        target: &TradeRecord,
        evaluation: Evaluation,
    ) -> MatchResult {
        MatchResult {
            source_trade_id: source.trade_id.clone(),
            target_trade_id: target.trade_id.clone(),
            score: evaluation.score,
            classification: evaluation.classification,
            requires_hitl: evaluation.classification.requires_hitl(),
            basis: evaluation.basis,
            discrepancies: build_report(&evaluation.comparisons),
            field_comparisons: evaluation.comparisons,
            ambiguous_targets: Vec::new(),
        }
    }
}

/// Decides a pair by UTI, then USI, when both sides carry one.
fn identifier_decision(source: &TradeRecord, target: &TradeRecord) -> Option<Evaluation> {
    let (field, basis) = [(TradeField::Uti, MatchBasis::Uti), (TradeField::Usi, MatchBasis::Usi)]
        .into_iter()
        .find(|(field, _)| source.raw_field(*field).is_some() && target.raw_field(*field).is_some())?;

    let comparison = MatchRule::Exact.compare(field, source.raw_field(field), target.raw_field(field));
    let (score, classification) = if comparison.verdict == Verdict::Match {
        (1.0, Classification::Matched)
    } else {
        (0.0, Classification::Break)
    };
    debug!(
        source = %source.trade_id,
        target = %target.trade_id,
        identifier = %field,
        classification = %classification,
        "Decided pair by identifier"
    );
    Some(Evaluation {
        basis,
        score,
        classification,
        comparisons: vec![comparison],
    })
}

/// Evaluates one pair under `criteria`.
///
/// # Errors
///
/// Returns [`ConfigurationError`] before any scoring when the criteria are
/// invalid.
pub fn match_pair(
    source: &TradeRecord,
    target: &TradeRecord,
    criteria: &MatchingCriteria,
) -> Result<MatchResult, ConfigurationError> {
    Ok(MatchingEngine::new(criteria.clone())?.match_pair(source, target))
}

/// Best target for `source` in `pool` under `criteria`.
///
/// # Errors
///
/// Returns [`ConfigurationError`] when the criteria are invalid.
pub fn select_best_match(
    source: &TradeRecord,
    pool: &[TradeRecord],
    criteria: &MatchingCriteria,
) -> Result<Option<MatchResult>, ConfigurationError> {
    Ok(MatchingEngine::new(criteria.clone())?.select_best_match(source, pool))
}

/// Greedy one-to-one matching of two pools under `criteria`.
///
/// # Errors
///
/// Returns [`ConfigurationError`] when the criteria are invalid.
pub fn match_batch(
    sources: &[TradeRecord],
    targets: &[TradeRecord],
    criteria: &MatchingCriteria,
) -> Result<BatchOutcome, ConfigurationError> {
    Ok(MatchingEngine::new(criteria.clone())?.match_batch(sources, targets))
}
