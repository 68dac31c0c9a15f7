//! Field-level discrepancy reports for human review.

use recon_core::types::{FieldType, TradeField};
use serde::{Deserialize, Serialize};

use crate::compare::{FieldComparisonResult, Verdict};

/// One field that did not match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    /// Field key
    pub field_name: TradeField,
    /// Human-readable field label
    pub label: String,
    /// MISMATCH or MISSING
    pub verdict: Verdict,
    /// Raw source value
    pub source_value: Option<String>,
    /// Raw target value
    pub target_value: Option<String>,
    /// Numeric delta (day delta for dates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<f64>,
    /// Either value was not recognised by the normaliser
    #[serde(default)]
    pub low_confidence: bool,
    /// One-line explanation
    pub description: String,
}

/// Keeps the MISMATCH and MISSING comparisons, in evaluation order.
pub fn build_report(comparisons: &[FieldComparisonResult]) -> Vec<Discrepancy> {
    comparisons
        .iter()
        .filter(|c| c.verdict != Verdict::Match)
        .map(|c| Discrepancy {
            field_name: c.field_name,
            label: c.field_name.label().to_string(),
            verdict: c.verdict,
            source_value: c.source_value.clone(),
            target_value: c.target_value.clone(),
            difference: c.difference,
            low_confidence: c.low_confidence,
            description: describe(c),
        })
        .collect()
}

fn describe(c: &FieldComparisonResult) -> String {
    let label = c.field_name.label();
    match (c.verdict, &c.source_value, &c.target_value) {
        (Verdict::Missing, None, None) => format!("{} is missing on both sides", label),
        (Verdict::Missing, None, Some(_)) => format!("{} is missing on the source side", label),
        (Verdict::Missing, Some(_), None) => format!("{} is missing on the target side", label),
        (Verdict::Missing, Some(_), Some(_)) => {
            format!("{} could not be read on at least one side", label)
        }
        _ => match (c.field_name.field_type() == FieldType::Date, c.difference, c.similarity) {
            (true, Some(days), _) => format!("{} differs by {} days", label, days.abs()),
            (false, Some(diff), _) => format!("{} differs by {}", label, diff),
            (_, None, Some(similarity)) => {
                format!("{} similarity {:.2} is below threshold", label, similarity)
            }
            _ => format!(
                "{} differs: {} vs {}",
                label,
                c.source_value.as_deref().unwrap_or_default(),
                c.target_value.as_deref().unwrap_or_default()
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{compare, MatchRule};

    #[test]
    fn test_keeps_only_problems_in_order() {
        let comparisons = vec![
            compare(TradeField::Currency, Some("USD"), Some("USD"), &MatchRule::Exact),
            compare(TradeField::TradeDate, Some("2024-01-15"), Some("2024-01-17"), &MatchRule::Exact),
            compare(TradeField::NotionalAmount, Some("1000"), None, &MatchRule::NumericTolerance(0.0)),
        ];
        let report = build_report(&comparisons);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].field_name, TradeField::TradeDate);
        assert_eq!(report[0].description, "Trade Date differs by 2 days");
        assert_eq!(report[1].verdict, Verdict::Missing);
        assert_eq!(report[1].label, "Notional Amount");
        assert_eq!(report[1].description, "Notional Amount is missing on the target side");
    }

    #[test]
    fn test_numeric_difference_and_raw_values() {
        let comparisons = vec![compare(
            TradeField::NotionalAmount,
            Some("$1,000,000"),
            Some("990,000"),
            &MatchRule::NumericTolerance(0.001),
        )];
        let report = build_report(&comparisons);
        assert_eq!(report[0].difference, Some(10000.0));
        assert_eq!(report[0].source_value.as_deref(), Some("$1,000,000"));
        assert_eq!(report[0].description, "Notional Amount differs by 10000");
    }

    #[test]
    fn test_fuzzy_and_exact_descriptions() {
        let report = build_report(&[
            compare(
                TradeField::CounterpartyName,
                Some("Acme Corp"),
                Some("Zenith Ltd"),
                &MatchRule::FuzzyString(0.85),
            ),
            compare(TradeField::Currency, Some("USD"), Some("EUR"), &MatchRule::Exact),
            compare(TradeField::Currency, Some("??"), Some("EUR"), &MatchRule::Exact),
        ]);
        assert!(report[0].description.contains("similarity"));
        assert_eq!(report[1].description, "Currency differs: USD vs EUR");
        assert_eq!(report[2].verdict, Verdict::Mismatch);
    }

    #[test]
    fn test_low_confidence_carried_into_report() {
        let report = build_report(&[
            compare(TradeField::Currency, Some("Doubloons"), Some("USD"), &MatchRule::Exact),
            compare(TradeField::ProductType, Some("IRS"), Some("Swaption"), &MatchRule::Exact),
        ]);
        assert_eq!(report.len(), 2);
        assert!(report[0].low_confidence);
        assert!(!report[1].low_confidence);
    }

    #[test]
    fn test_unreadable_values() {
        let report = build_report(&[compare(
            TradeField::TradeDate,
            Some("sometime"),
            Some("2024-01-15"),
            &MatchRule::Exact,
        )]);
        assert_eq!(
            report[0].description,
            "Trade Date could not be read on at least one side"
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(build_report(&[]).is_empty());
    }
}
