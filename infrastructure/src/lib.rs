//! Infrastructure layer for wikiqa
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod inference;
pub mod retrieval;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileInferenceConfig, FileOutputConfig,
    FileOutputFormat, FileReaderConfig, FileReplConfig, FileRetrievalConfig,
};
pub use inference::{HfTokenizer, HttpReadingModel, SubwordTokenizer};
pub use retrieval::WikipediaRetriever;
