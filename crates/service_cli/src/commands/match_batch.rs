//! Match-batch command implementation
//!
//! Pairs a file of bank confirmations with a file of counterparty
//! confirmations.

use recon_core::types::SourceType;
use recon_matching::MatchingEngine;
use tracing::info;

use crate::config::{OutputFormat, ReconConfig};
use crate::loader::load_trades;
use crate::output::render_batch;
use crate::Result;

/// Run the match-batch command
pub fn run(config: &ReconConfig, bank: &str, counterparty: &str, format: OutputFormat) -> Result<()> {
    info!("Starting batch reconciliation...");
    info!("  Bank trades: {}", bank);
    info!("  Counterparty trades: {}", counterparty);

    let sources = load_trades(bank, SourceType::Bank)?;
    let targets = load_trades(counterparty, SourceType::Counterparty)?;

    let engine = MatchingEngine::new(config.criteria.clone())?.with_parallel_config(config.parallel());
    let outcome = engine.match_batch(&sources, &targets);

    println!("{}", render_batch(&outcome, format)?);

    info!("Batch reconciliation complete");
    Ok(())
}
