//! Field-level comparison of two raw trade values.
//!
//! Both sides are normalised before comparison. A value that is absent or
//! fails normalisation yields [`Verdict::Missing`]; comparison never fails.
//!
//! Comparison rules are a strategy behind [`FieldComparator`], so an
//! alternative rule (for example a semantic comparator backed by an external
//! model) can replace a field's built-in rule without touching scoring,
//! classification or selection.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use recon_core::normalize::normalize;
use recon_core::types::{FieldType, TradeField};
use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

/// Floor on the denominator of a relative difference.
const RELATIVE_EPSILON: f64 = 1e-12;

/// Outcome of one field comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Both values present and equal under the rule
    Match,
    /// Both values present and different under the rule
    Mismatch,
    /// At least one value absent or unreadable
    Missing,
}

impl Verdict {
    /// Wire name of the verdict.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Match => "MATCH",
            Verdict::Mismatch => "MISMATCH",
            Verdict::Missing => "MISSING",
        }
    }
}

/// How two normalised values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "param", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchRule {
    /// Normalised values must be identical strings
    Exact,
    /// `|v1 - v2| / max(|v1|, eps) <= tol`, absolute when `v1 == 0`
    NumericTolerance(f64),
    /// Token-set similarity must reach the threshold
    FuzzyString(f64),
    /// Dates may differ by at most this many days
    DateWindow(u32),
}

/// Result of comparing one named field between two trade records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldComparisonResult {
    /// Field compared
    pub field_name: TradeField,
    /// Raw source value
    pub source_value: Option<String>,
    /// Raw target value
    pub target_value: Option<String>,
    /// Comparison verdict
    pub verdict: Verdict,
    /// `v1 - v2` for numeric fields, day delta for dates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<f64>,
    /// Token-set similarity for fuzzy comparisons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    /// Whether the values agree within the rule's tolerance
    pub within_tolerance: bool,
    /// Set when either value passed normalisation without being recognised
    #[serde(default)]
    pub low_confidence: bool,
}

impl FieldComparisonResult {
    /// Missing verdict carrying whatever raw values were supplied.
    pub fn missing(field: TradeField, source: Option<&str>, target: Option<&str>) -> Self {
        Self {
            field_name: field,
            source_value: source.map(str::to_string),
            target_value: target.map(str::to_string),
            verdict: Verdict::Missing,
            difference: None,
            similarity: None,
            within_tolerance: false,
            low_confidence: false,
        }
    }

    /// True when the verdict is [`Verdict::Match`].
    pub fn is_match(&self) -> bool {
        self.verdict == Verdict::Match
    }
}

/// Strategy for comparing one field.
///
/// Implementations must be pure: the same inputs always produce the same
/// result, and a bad value yields [`Verdict::Missing`] rather than an error.
pub trait FieldComparator: Send + Sync {
    /// Compares raw `source` and `target` values of `field`.
    fn compare(
        &self,
        field: TradeField,
        source: Option<&str>,
        target: Option<&str>,
    ) -> FieldComparisonResult;
}

impl FieldComparator for MatchRule {
    fn compare(
        &self,
        field: TradeField,
        source: Option<&str>,
        target: Option<&str>,
    ) -> FieldComparisonResult {
        compare(field, source, target, self)
    }
}

/// Compares two raw values of `field` under `rule`.
///
/// # Examples
///
/// ```
/// use recon_core::types::TradeField;
/// use recon_matching::{compare, MatchRule, Verdict};
///
/// let r = compare(
///     TradeField::NotionalAmount,
///     Some("1,000,000.00"),
///     Some("999,950"),
///     &MatchRule::NumericTolerance(0.01),
/// );
/// assert_eq!(r.verdict, Verdict::Match);
/// assert_eq!(r.difference, Some(50.0));
/// ```
pub fn compare(
    field: TradeField,
    source: Option<&str>,
    target: Option<&str>,
    rule: &MatchRule,
) -> FieldComparisonResult {
    let field_type = field.field_type();
    let (s, t) = match (source, target) {
        (Some(s), Some(t)) => (s, t),
        _ => return FieldComparisonResult::missing(field, source, target),
    };
    let (a, b) = match (normalize(s, field_type), normalize(t, field_type)) {
        (Ok(a), Ok(b)) => (a, b),
        _ => return FieldComparisonResult::missing(field, source, target),
    };
    let low_confidence = a.low_confidence || b.low_confidence;
    let (n1, n2) = (a.value, b.value);

    let difference = match field_type {
        FieldType::Amount | FieldType::Rate => numeric_difference(&n1, &n2),
        FieldType::Date => day_difference(&n1, &n2).map(|d| d as f64),
        _ => None,
    };

    let mut similarity = None;
    let within_tolerance = match *rule {
        MatchRule::Exact => n1 == n2,
        MatchRule::NumericTolerance(tol) => match (n1.parse::<f64>(), n2.parse::<f64>()) {
            (Ok(v1), Ok(v2)) => within_relative(v1, v2, tol),
            _ => n1 == n2,
        },
        MatchRule::FuzzyString(threshold) => {
            let ratio = token_set_ratio(&n1, &n2);
            similarity = Some(ratio);
            ratio >= threshold
        }
        MatchRule::DateWindow(days) => match day_difference(&n1, &n2) {
            Some(delta) => delta.unsigned_abs() <= u64::from(days),
            None => n1 == n2,
        },
    };

    FieldComparisonResult {
        field_name: field,
        source_value: Some(s.to_string()),
        target_value: Some(t.to_string()),
        verdict: if within_tolerance {
            Verdict::Match
        } else {
            Verdict::Mismatch
        },
        difference,
        similarity,
        within_tolerance,
        low_confidence,
    }
}

/// Relative tolerance against the source value, absolute when it is zero.
fn within_relative(v1: f64, v2: f64, tol: f64) -> bool {
    let diff = (v1 - v2).abs();
    if v1 == 0.0 {
        diff <= tol
    } else {
        diff / v1.abs().max(RELATIVE_EPSILON) <= tol
    }
}

fn numeric_difference(n1: &str, n2: &str) -> Option<f64> {
    match (n1.parse::<f64>(), n2.parse::<f64>()) {
        (Ok(v1), Ok(v2)) => Some(v1 - v2),
        _ => None,
    }
}

fn day_difference(n1: &str, n2: &str) -> Option<i64> {
    let d1 = NaiveDate::parse_from_str(n1, "%Y-%m-%d").ok()?;
    let d2 = NaiveDate::parse_from_str(n2, "%Y-%m-%d").ok()?;
    Some((d1 - d2).num_days())
}

/// Token-set similarity in `[0, 1]`.
///
/// Tokens are split on whitespace and deduplicated. The shared tokens and
/// each side's remainder are sorted and recombined, and the best pairwise
/// normalised Levenshtein similarity among the three strings is returned.
/// Word order and repeated words therefore do not matter, and a name whose
/// tokens are a subset of the other's scores 1.0.
///
/// ```
/// use recon_matching::token_set_ratio;
///
/// assert_eq!(token_set_ratio("bank of america", "america bank of"), 1.0);
/// assert!(token_set_ratio("acme corp", "zenith ltd") < 0.5);
/// ```
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let ta: BTreeSet<&str> = a.split_whitespace().collect();
    let tb: BTreeSet<&str> = b.split_whitespace().collect();
    if ta.is_empty() && tb.is_empty() {
        return 1.0;
    }
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let join = |tokens: Vec<&str>| tokens.join(" ");
    let common = join(ta.intersection(&tb).copied().collect());
    let only_a = join(ta.difference(&tb).copied().collect());
    let only_b = join(tb.difference(&ta).copied().collect());

    let combine = |rest: &str| {
        if common.is_empty() {
            rest.to_string()
        } else if rest.is_empty() {
            common.clone()
        } else {
            format!("{} {}", common, rest)
        }
    };
    let with_a = combine(&only_a);
    let with_b = combine(&only_b);

    let mut best = normalized_levenshtein(&with_a, &with_b);
    if !common.is_empty() {
        best = best
            .max(normalized_levenshtein(&common, &with_a))
            .max(normalized_levenshtein(&common, &with_b));
    }
    best.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_after_normalisation() {
        let r = compare(
            TradeField::TradeDate,
            Some("01/15/2024"),
            Some("2024-01-15"),
            &MatchRule::Exact,
        );
        assert_eq!(r.verdict, Verdict::Match);
        assert_eq!(r.difference, Some(0.0));
        assert!(r.within_tolerance);

        let r = compare(TradeField::Currency, Some("Euro"), Some("USD"), &MatchRule::Exact);
        assert_eq!(r.verdict, Verdict::Mismatch);
        assert!(!r.within_tolerance);
        assert_eq!(r.difference, None);
    }

    #[test]
    fn test_missing_sides() {
        let r = compare(TradeField::Currency, None, Some("USD"), &MatchRule::Exact);
        assert_eq!(r.verdict, Verdict::Missing);
        assert_eq!(r.target_value.as_deref(), Some("USD"));

        let r = compare(TradeField::Currency, None, None, &MatchRule::Exact);
        assert_eq!(r.verdict, Verdict::Missing);
    }

    #[test]
    fn test_unparseable_amount_is_missing() {
        let r = compare(
            TradeField::NotionalAmount,
            Some("TBD"),
            Some("1000000"),
            &MatchRule::NumericTolerance(0.01),
        );
        assert_eq!(r.verdict, Verdict::Missing);
        assert_eq!(r.difference, None);
        assert_eq!(r.source_value.as_deref(), Some("TBD"));
    }

    #[test]
    fn test_numeric_tolerance_relative_to_source() {
        let rule = MatchRule::NumericTolerance(0.01);
        let r = compare(
            TradeField::NotionalAmount,
            Some("1000000.00"),
            Some("999950.00"),
            &rule,
        );
        assert_eq!(r.verdict, Verdict::Match);
        assert_relative_eq!(r.difference.unwrap(), 50.0);

        let r = compare(TradeField::NotionalAmount, Some("100"), Some("102"), &rule);
        assert_eq!(r.verdict, Verdict::Mismatch);
        assert_relative_eq!(r.difference.unwrap(), -2.0);
    }

    #[test]
    fn test_numeric_zero_source_uses_absolute_difference() {
        let rule = MatchRule::NumericTolerance(0.01);
        assert!(within_relative(0.0, 0.005, 0.01));
        assert!(!within_relative(0.0, 0.5, 0.01));
        let r = compare(TradeField::FixedRate, Some("0%"), Some("0.5bp"), &rule);
        assert_eq!(r.verdict, Verdict::Match);
    }

    #[test]
    fn test_zero_tolerance_requires_equality() {
        let rule = MatchRule::NumericTolerance(0.0);
        let r = compare(TradeField::FixedRate, Some("4.25%"), Some("0.0425"), &rule);
        assert_eq!(r.verdict, Verdict::Match);
        let r = compare(TradeField::FixedRate, Some("4.25%"), Some("4.26%"), &rule);
        assert_eq!(r.verdict, Verdict::Mismatch);
    }

    #[test]
    fn test_fuzzy_names() {
        let rule = MatchRule::FuzzyString(0.85);
        let r = compare(
            TradeField::CounterpartyName,
            Some("Goldman Sachs International"),
            Some("GOLDMAN SACHS INTL."),
            &rule,
        );
        assert_eq!(r.verdict, Verdict::Match);
        assert_relative_eq!(r.similarity.unwrap(), 1.0);

        let r = compare(
            TradeField::CounterpartyName,
            Some("Goldman Sachs"),
            Some("Morgan Stanley"),
            &rule,
        );
        assert_eq!(r.verdict, Verdict::Mismatch);
        assert!(r.similarity.unwrap() < 0.85);
    }

    #[test]
    fn test_date_window() {
        let rule = MatchRule::DateWindow(1);
        let r = compare(
            TradeField::TradeDate,
            Some("2024-01-15"),
            Some("16 Jan 2024"),
            &rule,
        );
        assert_eq!(r.verdict, Verdict::Match);
        assert_eq!(r.difference, Some(-1.0));

        let r = compare(TradeField::TradeDate, Some("2024-01-15"), Some("2024-01-18"), &rule);
        assert_eq!(r.verdict, Verdict::Mismatch);
        assert_eq!(r.difference, Some(-3.0));
    }

    #[test]
    fn test_unrecognised_values_flag_low_confidence() {
        let r = compare(TradeField::Currency, Some("Doubloons"), Some("Doubloons"), &MatchRule::Exact);
        assert_eq!(r.verdict, Verdict::Match);
        assert!(r.low_confidence);

        let r = compare(TradeField::Currency, Some("US Dollars"), Some("XAU"), &MatchRule::Exact);
        assert_eq!(r.verdict, Verdict::Mismatch);
        assert!(r.low_confidence);

        let r = compare(
            TradeField::ProductType,
            Some("Variance Swap"),
            Some("variance swap"),
            &MatchRule::Exact,
        );
        assert_eq!(r.verdict, Verdict::Match);
        assert!(r.low_confidence);

        let r = compare(TradeField::ProductType, Some("IRS"), Some("Interest Rate Swap"), &MatchRule::Exact);
        assert!(!r.low_confidence);
        assert!(!compare(TradeField::Currency, None, Some("XAU"), &MatchRule::Exact).low_confidence);
    }

    #[test]
    fn test_token_set_ratio_properties() {
        assert_relative_eq!(token_set_ratio("", ""), 1.0);
        assert_relative_eq!(token_set_ratio("acme", ""), 0.0);
        assert_relative_eq!(token_set_ratio("acme corp", "corp acme acme"), 1.0);
        assert_relative_eq!(token_set_ratio("acme", "acme holdings"), 1.0);
        let r = token_set_ratio("deutsche bank ag", "deutsche bnk ag");
        assert!(r > 0.8 && r < 1.0);
        assert_relative_eq!(
            token_set_ratio("abc def", "xyz"),
            token_set_ratio("xyz", "abc def")
        );
    }

    #[test]
    fn test_rule_as_comparator() {
        let comparator: &dyn FieldComparator = &MatchRule::Exact;
        let r = comparator.compare(TradeField::ProductType, Some("IRS"), Some("Interest Rate Swap"));
        assert!(r.is_match());
    }

    #[test]
    fn test_serialises_camel_case() {
        let r = compare(TradeField::Currency, Some("USD"), Some("EUR"), &MatchRule::Exact);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["fieldName"], "currency");
        assert_eq!(json["verdict"], "MISMATCH");
        assert_eq!(json["withinTolerance"], false);
        assert_eq!(json["lowConfidence"], false);
        assert!(json.get("difference").is_none());
    }
}
