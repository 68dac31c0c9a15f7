//! Error types for the otc-recon CLI.

use recon_matching::ConfigurationError;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Run configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Matching criteria rejected by the engine
    #[error("Matching criteria error: {0}")]
    Criteria(#[from] ConfigurationError),

    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Input file could not be read as trades
    #[error("Failed to load trades from {path}: {message}")]
    Load {
        /// Offending file
        path: String,
        /// Reader message
        message: String,
    },

    /// Invalid command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Output rendering failed
    #[error("Output error: {0}")]
    Output(String),

    /// Logging could not be initialised
    #[error("Logging setup failed: {0}")]
    Logging(#[from] anyhow::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create a load error for `path`
    pub fn load(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::load("bank.csv", "missing field `tradeId`");
        assert_eq!(
            err.to_string(),
            "Failed to load trades from bank.csv: missing field `tradeId`"
        );
    }

    #[test]
    fn test_criteria_error_converts() {
        let err: CliError = ConfigurationError::Parse("bad".to_string()).into();
        assert!(err.to_string().contains("Matching criteria error"));
    }
}
