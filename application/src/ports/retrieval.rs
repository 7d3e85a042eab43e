//! Document retrieval port
//!
//! Defines how the application layer obtains candidate documents for a query.

use async_trait::async_trait;
use thiserror::Error;
use wikiqa_domain::Document;

/// Errors that can occur while retrieving documents
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetrievalError {
    #[error("Search service unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected search response: {0}")]
    Malformed(String),

    #[error("Timeout")]
    Timeout,
}

/// Source of candidate documents
///
/// Implementations (adapters) live in the infrastructure layer. The returned
/// list is ordered by relevance and each text is already cut to
/// `characters_per_article` characters.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    async fn get_articles(
        &self,
        query: &str,
        num_articles: usize,
        characters_per_article: usize,
    ) -> Result<Vec<Document>, RetrievalError>;
}
