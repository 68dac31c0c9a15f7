//! Rendering of match results as JSON, text tables or CSV.

use recon_matching::{BatchOutcome, MatchResult};

use crate::config::OutputFormat;
use crate::{CliError, Result};

const CSV_HEADER: [&str; 8] = [
    "sourceTradeId",
    "targetTradeId",
    "score",
    "classification",
    "requiresHITL",
    "basis",
    "discrepancies",
    "ambiguousTargets",
];

/// Renders a single pair decision.
pub fn render_result(result: &MatchResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Csv => to_csv(std::slice::from_ref(result)),
        OutputFormat::Table => {
            let mut out = results_table(std::slice::from_ref(result));
            if !result.discrepancies.is_empty() {
                out.push('\n');
                out.push_str(&discrepancy_table(result));
            }
            Ok(out)
        }
    }
}

/// Renders a batch outcome.
pub fn render_batch(outcome: &BatchOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(outcome),
        OutputFormat::Csv => to_csv(&outcome.matches),
        OutputFormat::Table => {
            let mut out = results_table(&outcome.matches);
            let unmatched = |trades: &[recon_core::types::TradeRecord]| {
                trades
                    .iter()
                    .map(|t| t.trade_id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let summary = outcome.summary();
            out.push_str(&format!(
                "\nMatched: {}  Probable: {}  Review: {}  HITL: {}\n",
                summary.matched, summary.probable_match, summary.review_required, summary.requires_hitl
            ));
            out.push_str(&format!(
                "Unmatched sources ({}): {}\n",
                summary.unmatched_sources,
                unmatched(&outcome.unmatched_sources)
            ));
            out.push_str(&format!(
                "Unmatched targets ({}): {}\n",
                summary.unmatched_targets,
                unmatched(&outcome.unmatched_targets)
            ));
            Ok(out)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))
}

fn to_csv(results: &[MatchResult]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let output_err = |e: csv::Error| CliError::Output(e.to_string());

    writer.write_record(CSV_HEADER).map_err(output_err)?;
    for r in results {
        let fields: Vec<&str> = r.discrepancies.iter().map(|d| d.field_name.key()).collect();
        writer
            .write_record([
                r.source_trade_id.clone(),
                r.target_trade_id.clone(),
                format!("{:.4}", r.score),
                r.classification.to_string(),
                r.requires_hitl.to_string(),
                r.basis.as_str().to_string(),
                fields.join(";"),
                r.ambiguous_targets.join(";"),
            ])
            .map_err(output_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CliError::Output(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CliError::Output(e.to_string()))
}

fn results_table(results: &[MatchResult]) -> String {
    let mut out = format!(
        "{:<16} {:<16} {:>7} {:<16} {:<5} {:<8}\n",
        "SOURCE", "TARGET", "SCORE", "CLASSIFICATION", "HITL", "BASIS"
    );
    out.push_str(&format!("{}\n", "-".repeat(73)));
    for r in results {
        out.push_str(&format!(
            "{:<16} {:<16} {:>7.4} {:<16} {:<5} {:<8}\n",
            r.source_trade_id,
            r.target_trade_id,
            r.score,
            r.classification.as_str(),
            if r.requires_hitl { "yes" } else { "no" },
            r.basis.as_str(),
        ));
    }
    out
}

fn discrepancy_table(result: &MatchResult) -> String {
    let mut out = format!(
        "{:<18} {:<8} {:<22} {:<22} {}\n",
        "FIELD", "VERDICT", "SOURCE", "TARGET", "DETAIL"
    );
    for d in &result.discrepancies {
        let flag = if d.low_confidence { " (low confidence)" } else { "" };
        out.push_str(&format!(
            "{:<18} {:<8} {:<22} {:<22} {}{}\n",
            d.label,
            d.verdict.as_str(),
            d.source_value.as_deref().unwrap_or("-"),
            d.target_value.as_deref().unwrap_or("-"),
            d.description,
            flag
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_core::types::{SourceType, TradeField, TradeRecord};
    use recon_matching::{match_batch, match_pair, MatchingCriteria};

    fn pair() -> (TradeRecord, TradeRecord) {
        (
            TradeRecord::new("B-1", SourceType::Bank)
                .with(TradeField::TradeDate, "2024-01-15")
                .with(TradeField::NotionalAmount, "1,000,000")
                .with(TradeField::Currency, "USD")
                .with(TradeField::CounterpartyName, "Acme Corp"),
            TradeRecord::new("C-1", SourceType::Counterparty)
                .with(TradeField::TradeDate, "2024-01-16")
                .with(TradeField::NotionalAmount, "1000000")
                .with(TradeField::Currency, "USD")
                .with(TradeField::CounterpartyName, "ACME Corporation"),
        )
    }

    #[test]
    fn test_table_lists_discrepancies() {
        let (b, c) = pair();
        let result = match_pair(&b, &c, &MatchingCriteria::default()).unwrap();
        let out = render_result(&result, OutputFormat::Table).unwrap();
        assert!(out.contains("B-1"));
        assert!(out.contains("PROBABLE_MATCH"));
        assert!(out.contains("Trade Date"));
        assert!(out.contains("MISMATCH"));
    }

    #[test]
    fn test_csv_rows() {
        let (b, c) = pair();
        let result = match_pair(&b, &c, &MatchingCriteria::default()).unwrap();
        let out = render_result(&result, OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("sourceTradeId,targetTradeId,score"));
        assert!(lines[1].starts_with("B-1,C-1,0.7857,PROBABLE_MATCH,true"));
        assert!(lines[1].contains("trade_date"));
        assert!(lines[1].contains("WEIGHTED"));
    }

    #[test]
    fn test_json_batch() {
        let (b, c) = pair();
        let outcome = match_batch(&[b], &[c], &MatchingCriteria::default()).unwrap();
        let out = render_batch(&outcome, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["matches"][0]["targetTradeId"], "C-1");
        assert_eq!(value["unmatchedSources"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_batch_table_summary() {
        let (b, _) = pair();
        let outcome = match_batch(&[b], &[], &MatchingCriteria::default()).unwrap();
        let out = render_batch(&outcome, OutputFormat::Table).unwrap();
        assert!(out.contains("Unmatched sources (1): B-1"));
        assert!(out.contains("Unmatched targets (0)"));
    }
}
