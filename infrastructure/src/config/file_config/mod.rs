//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod inference;
mod output;
mod reader;
mod repl;
mod retrieval;

pub use inference::{DEFAULT_PREDICT_ENDPOINT, FileInferenceConfig};
pub use output::{FileOutputConfig, FileOutputFormat};
pub use reader::FileReaderConfig;
pub use repl::FileReplConfig;
pub use retrieval::{DEFAULT_WIKIPEDIA_ENDPOINT, FileRetrievalConfig};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use wikiqa_application::ReaderConfig;

/// A problem found in an otherwise well-formed configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{field} cannot be 0")]
    Zero { field: &'static str },

    #[error("{field} cannot be empty")]
    EmptyValue { field: &'static str },

    #[error("{field}: unknown value '{value}' (expected one of: {expected})")]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Article search and fetch
    pub retrieval: FileRetrievalConfig,
    /// Model server and tokenizer
    pub inference: FileInferenceConfig,
    /// Chunk budget and decision rules
    pub reader: FileReaderConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        let zero_checks = [
            ("retrieval.num_articles", self.retrieval.num_articles == 0),
            (
                "retrieval.characters_per_article",
                self.retrieval.characters_per_article == 0,
            ),
            (
                "retrieval.timeout_seconds",
                self.retrieval.timeout_seconds == Some(0),
            ),
            (
                "inference.timeout_seconds",
                self.inference.timeout_seconds == Some(0),
            ),
            (
                "inference.max_concurrency",
                self.inference.max_concurrency == 0,
            ),
        ];
        for (field, is_zero) in zero_checks {
            if is_zero {
                issues.push(ConfigValidationError::Zero { field });
            }
        }

        let empty_checks = [
            ("retrieval.endpoint", &self.retrieval.endpoint),
            ("inference.endpoint", &self.inference.endpoint),
            ("inference.signature_name", &self.inference.signature_name),
        ];
        for (field, value) in empty_checks {
            if value.trim().is_empty() {
                issues.push(ConfigValidationError::EmptyValue { field });
            }
        }

        if self.reader.parse_decision().is_err() {
            issues.push(ConfigValidationError::InvalidEnumValue {
                field: "reader.decision",
                value: self.reader.decision.clone(),
                expected: "legacy, best",
            });
        }
        if self.reader.parse_span_policy().is_err() {
            issues.push(ConfigValidationError::InvalidEnumValue {
                field: "reader.span_policy",
                value: self.reader.span_policy.clone(),
                expected: "clamp, reject",
            });
        }

        issues
    }

    /// Build the use case configuration
    ///
    /// Unparseable enum strings fall back to their defaults; call
    /// [`validate`](Self::validate) first to report them.
    pub fn to_reader_config(&self) -> ReaderConfig {
        ReaderConfig::default()
            .with_num_articles(self.retrieval.num_articles)
            .with_characters_per_article(self.retrieval.characters_per_article)
            .with_safety_margin(self.reader.safety_margin)
            .with_decision(self.reader.parse_decision().unwrap_or_default())
            .with_max_concurrency(self.inference.max_concurrency)
            .with_inference_timeout(self.inference.timeout_seconds.map(Duration::from_secs))
            .with_retrieval_timeout(self.retrieval.timeout_seconds.map(Duration::from_secs))
    }
}
