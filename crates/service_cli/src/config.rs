//! Run configuration management.
//!
//! Handles loading of the reconciliation run configuration from TOML files
//! with environment variable override support.
//!
//! ```toml
//! log_level = "info"
//! output_format = "table"
//! parallel_threshold = 256
//!
//! [criteria]
//! auto_confirm_threshold = 0.9
//! ```

use std::path::Path;
use std::str::FromStr;

use recon_matching::{MatchingCriteria, ParallelConfig};
use serde::Deserialize;
use thiserror::Error;

/// Output rendering for match results
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Aligned text table
    #[default]
    Table,
    /// CSV, one row per match
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            other => Err(format!(
                "Unknown output format: {}. Supported: json, table, csv",
                other
            )),
        }
    }
}

/// Reconciliation run configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Default tracing directive
    pub log_level: String,

    /// Default output format
    pub output_format: OutputFormat,

    /// Pair count from which batch scoring runs in parallel
    pub parallel_threshold: usize,

    /// Minimum source rows per parallel job
    pub batch_size: usize,

    /// Matching criteria for the run
    pub criteria: MatchingCriteria,
}

impl Default for ReconConfig {
    fn default() -> Self {
        let parallel = ParallelConfig::default();
        Self {
            log_level: "info".to_string(),
            output_format: OutputFormat::default(),
            parallel_threshold: parallel.parallel_threshold,
            batch_size: parallel.batch_size,
            criteria: MatchingCriteria::default(),
        }
    }
}

impl ReconConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from `path`, or defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    pub fn with_env_override(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; unparseable numbers are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("RECON_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(format) = lookup("RECON_OUTPUT_FORMAT") {
            self.output_format = format.parse().unwrap_or(self.output_format);
        }

        let threshold = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());
        if let Some(value) = threshold("RECON_AUTO_CONFIRM_THRESHOLD") {
            self.criteria.auto_confirm_threshold = value;
        }
        if let Some(value) = threshold("RECON_REVIEW_THRESHOLD") {
            self.criteria.review_threshold = value;
        }
        if let Some(value) = threshold("RECON_MIN_SCORE_THRESHOLD") {
            self.criteria.min_score_threshold = value;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if self.batch_size == 0 {
            errors.push("batch_size must be greater than 0".to_string());
        }

        if let Err(e) = self.criteria.validate() {
            errors.push(format!("criteria: {}", e));
        }

        if self.criteria.enabled_fields().next().is_none() {
            errors.push("criteria: no field is enabled".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from file (or defaults) with environment overrides and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_or_default(path)?.with_env_override();
        config.validate()?;
        Ok(config)
    }

    /// Parallelism settings for batch matching
    pub fn parallel(&self) -> ParallelConfig {
        ParallelConfig::new(self.batch_size, self.parallel_threshold)
    }
}

/// Configuration error type
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_validates() {
        let config = ReconConfig::default();
        assert_eq!(config.output_format, OutputFormat::Table);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "output_format = \"json\"\n\n[criteria]\nreview_threshold = 0.6\n\n\
             [[criteria.fields]]\nfield = \"currency\"\nweight = 1.0\nrequired = true"
        )
        .unwrap();

        let config = ReconConfig::load(file.path()).unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.criteria.review_threshold, 0.6);
        assert_eq!(config.criteria.auto_confirm_threshold, 0.85);
        assert_eq!(config.criteria.fields.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReconConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.criteria, MatchingCriteria::default());
    }

    #[test]
    fn test_load_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output_format = \"xml\"").unwrap();
        assert!(matches!(
            ReconConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let config = ReconConfig::default().with_overrides(lookup(&[
            ("RECON_LOG_LEVEL", "debug"),
            ("RECON_OUTPUT_FORMAT", "CSV"),
            ("RECON_AUTO_CONFIRM_THRESHOLD", "0.9"),
            ("RECON_REVIEW_THRESHOLD", "not-a-number"),
        ]));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.criteria.auto_confirm_threshold, 0.9);
        assert_eq!(config.criteria.review_threshold, 0.70);
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let mut config = ReconConfig::default().with_overrides(lookup(&[
            ("RECON_REVIEW_THRESHOLD", "0.95"),
        ]));
        config.log_level = "loud".to_string();
        config.batch_size = 0;

        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 3);
                assert!(errors[0].contains("log_level"));
                assert!(errors[1].contains("batch_size"));
                assert!(errors[2].contains("review_threshold"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_an_enabled_field() {
        let mut config = ReconConfig::default();
        for field in &mut config.criteria.fields {
            field.enabled = false;
        }
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("no field is enabled"));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("Json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
