//! Reader model adapter
//!
//! - [`SubwordTokenizer`] / [`HfTokenizer`] - vocabulary-level tokenization
//! - [`protocol`] - `:predict` request and response bodies
//! - [`HttpReadingModel`] - the [`ReadingModel`](wikiqa_application::ReadingModel) implementation

pub mod client;
pub mod protocol;
pub mod tokenizer;

pub use client::HttpReadingModel;
pub use tokenizer::{HfTokenizer, SubwordTokenizer};

/// Serving signature invoked when none is configured
pub const DEFAULT_SIGNATURE_NAME: &str = "serving_default";
