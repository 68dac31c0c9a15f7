//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod match_batch;
pub mod match_pair;
