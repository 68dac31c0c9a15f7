//! Check command implementation
//!
//! Validates the run configuration and prints the effective criteria.

use recon_matching::MatchingEngine;
use tracing::info;

use crate::config::ReconConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &ReconConfig) -> Result<()> {
    info!("Checking configuration...");

    let engine = MatchingEngine::new(config.criteria.clone())?;
    let criteria = engine.criteria();

    println!("otc-recon v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Thresholds:");
    println!("  auto_confirm  {:.2}", criteria.auto_confirm_threshold);
    println!("  review        {:.2}", criteria.review_threshold);
    println!("  min_score     {:.2}", criteria.min_score_threshold);
    println!();
    println!(
        "{:<18} {:>7} {:<9} {:<8} {}",
        "FIELD", "WEIGHT", "REQUIRED", "ENABLED", "RULE"
    );
    for c in &criteria.fields {
        println!(
            "{:<18} {:>7.3} {:<9} {:<8} {:?}",
            c.field.key(),
            c.weight,
            if c.required { "yes" } else { "no" },
            if c.enabled { "yes" } else { "no" },
            c.rule()
        );
    }
    println!();
    println!("Total enabled weight: {:.3}", criteria.total_enabled_weight());
    println!("Parallel threshold: {} pairs", config.parallel_threshold);
    println!("Output format: {:?}", config.output_format);

    info!("Configuration OK");
    Ok(())
}
