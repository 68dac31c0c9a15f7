//! Match-pair command implementation
//!
//! Evaluates one bank confirmation against one counterparty confirmation.

use recon_core::types::SourceType;
use recon_matching::MatchingEngine;
use tracing::info;

use crate::config::{OutputFormat, ReconConfig};
use crate::loader::load_single_trade;
use crate::output::render_result;
use crate::Result;

/// Run the match-pair command
pub fn run(config: &ReconConfig, source: &str, target: &str, format: OutputFormat) -> Result<()> {
    info!("Matching pair...");
    info!("  Source: {}", source);
    info!("  Target: {}", target);

    let source_trade = load_single_trade(source, SourceType::Bank)?;
    let target_trade = load_single_trade(target, SourceType::Counterparty)?;

    let engine = MatchingEngine::new(config.criteria.clone())?;
    let result = engine.match_pair(&source_trade, &target_trade);

    println!("{}", render_result(&result, format)?);

    info!(
        "Pair {} / {} classified {}",
        result.source_trade_id, result.target_trade_id, result.classification
    );
    Ok(())
}
