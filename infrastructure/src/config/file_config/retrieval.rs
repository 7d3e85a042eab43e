//! Retrieval configuration from TOML (`[retrieval]` section)

use serde::{Deserialize, Serialize};

pub const DEFAULT_WIKIPEDIA_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Raw retrieval configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    /// Number of articles fetched per question
    pub num_articles: usize,
    /// Characters kept from the start of each article
    pub characters_per_article: usize,
    /// MediaWiki Action API endpoint
    pub endpoint: String,
    /// Timeout in seconds for the whole retrieval step
    pub timeout_seconds: Option<u64>,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            num_articles: 5,
            characters_per_article: 2500,
            endpoint: DEFAULT_WIKIPEDIA_ENDPOINT.to_string(),
            timeout_seconds: Some(30),
        }
    }
}
