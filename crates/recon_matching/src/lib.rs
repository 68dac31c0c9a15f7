//! # recon_matching (L2: Matching Kernel)
//!
//! Decides whether a bank confirmation and a counterparty confirmation
//! describe the same OTC transaction.
//!
//! This crate provides:
//! - `MatchingCriteria`: per-run field weights, tolerances and thresholds
//! - Field comparison rules (exact, numeric tolerance, fuzzy string, date window)
//!   behind the `FieldComparator` strategy trait
//! - Weighted scoring with required-field gating
//! - Score classification into MATCHED / PROBABLE_MATCH / REVIEW_REQUIRED / BREAK
//! - Greedy one-to-one candidate selection across trade pools
//! - Field-level discrepancy reports for human review
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          recon_matching (L2)            │
//! ├─────────────────────────────────────────┤
//! │  criteria/  - weights, thresholds       │
//! │  compare/   - per-field verdicts        │
//! │  score/     - weighted confidence       │
//! │  classify/  - outcome + HITL routing    │
//! │  select/    - one-to-one pool matching  │
//! │  report/    - discrepancy lists         │
//! │  engine/    - match_pair, match_batch   │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │             recon_core (L1)             │
//! │  TradeRecord, TradeField, normalize     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use recon_core::types::{SourceType, TradeField, TradeRecord};
//! use recon_matching::{match_pair, Classification, MatchingCriteria};
//!
//! let bank = TradeRecord::new("B-1", SourceType::Bank)
//!     .with(TradeField::TradeDate, "2024-01-15")
//!     .with(TradeField::NotionalAmount, "1,000,000.00")
//!     .with(TradeField::Currency, "USD")
//!     .with(TradeField::CounterpartyName, "Acme Corp");
//! let cpty = TradeRecord::new("C-7", SourceType::Counterparty)
//!     .with(TradeField::TradeDate, "15 Jan 2024")
//!     .with(TradeField::NotionalAmount, "USD 1000000")
//!     .with(TradeField::Currency, "US Dollars")
//!     .with(TradeField::CounterpartyName, "ACME Corporation");
//!
//! let result = match_pair(&bank, &cpty, &MatchingCriteria::default()).unwrap();
//! assert_eq!(result.classification, Classification::Matched);
//! assert!(!result.requires_hitl);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod classify;
pub mod compare;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod parallel;
pub mod report;
pub mod result;
pub mod score;
pub mod select;

pub use classify::{classify, classify_card, Classification};
pub use compare::{compare, token_set_ratio, FieldComparator, FieldComparisonResult, MatchRule, Verdict};
pub use criteria::{FieldCriterion, MatchingCriteria};
pub use engine::{match_batch, match_pair, select_best_match, MatchingEngine};
pub use error::ConfigurationError;
pub use parallel::ParallelConfig;
pub use report::{build_report, Discrepancy};
pub use result::{BatchOutcome, BatchSummary, MatchBasis, MatchResult};
pub use score::{score, ScoreCard};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        match_batch, match_pair, BatchOutcome, Classification, ConfigurationError,
        FieldComparator, FieldCriterion, MatchResult, MatchingCriteria, MatchingEngine, Verdict,
    };
    pub use recon_core::types::{SourceType, TradeField, TradeRecord};
}
