//! Trade file loading.
//!
//! Supported inputs:
//! - `.json`: an array of trade records, or a single record
//! - `.csv`: one record per row, camelCase headers (`tradeId`, `sourceType`,
//!   `tradeDate`, `notionalAmount`, ...); empty cells are absent values
//!
//! Records that violate the trade invariants are still loaded; each problem
//! is logged as a warning.

use std::path::Path;

use recon_core::types::{SourceType, TradeRecord};
use tracing::{info, warn};

use crate::{CliError, Result};

/// Loads every trade in `path`.
///
/// Records whose `sourceType` differs from `expected` are kept and logged.
pub fn load_trades(path: &str, expected: SourceType) -> Result<Vec<TradeRecord>> {
    let file = Path::new(path);
    if !file.exists() {
        return Err(CliError::FileNotFound(path.to_string()));
    }

    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let trades = match extension.as_str() {
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unsupported trade file extension '{}' for {}. Supported: json, csv",
                other, path
            )))
        }
    };

    for trade in &trades {
        if trade.source_type != expected {
            warn!(
                trade = %trade.trade_id,
                found = %trade.source_type,
                expected = %expected,
                "Unexpected source type"
            );
        }
        for issue in trade.validate() {
            warn!(trade = %trade.trade_id, "{}", issue);
        }
    }

    info!("Loaded {} trades from {}", trades.len(), path);
    Ok(trades)
}

/// Loads exactly one trade from `path`.
pub fn load_single_trade(path: &str, expected: SourceType) -> Result<TradeRecord> {
    let mut trades = load_trades(path, expected)?;
    match trades.len() {
        1 => Ok(trades.remove(0)),
        n => Err(CliError::InvalidArgument(format!(
            "{} must contain exactly one trade, found {}",
            path, n
        ))),
    }
}

fn load_json(path: &str) -> Result<Vec<TradeRecord>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<TradeRecord>),
        One(Box<TradeRecord>),
    }

    let content = std::fs::read_to_string(path)?;
    let parsed: OneOrMany =
        serde_json::from_str(&content).map_err(|e| CliError::load(path, e))?;
    Ok(match parsed {
        OneOrMany::Many(trades) => trades,
        OneOrMany::One(trade) => vec![*trade],
    })
}

fn load_csv(path: &str) -> Result<Vec<TradeRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CliError::load(path, e))?;

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<TradeRecord>, _>>()
        .map_err(|e| CliError::load(path, e))
}
