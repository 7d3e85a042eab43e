//! Document entities

use crate::core::string::truncate_chars;
use serde::{Deserialize, Serialize};

/// A retrieved source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub text: String,
}

impl Document {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }

    /// Build a document whose text is cut to `max_chars` characters
    pub fn truncated(title: impl Into<String>, text: &str, max_chars: usize) -> Self {
        Self::new(title, truncate_chars(text, max_chars))
    }

    /// Number of whitespace-separated words in the text
    pub fn token_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A bounded window of a document's words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub article_title: String,
    pub text: String,
}

impl Chunk {
    pub fn new(article_title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            article_title: article_title.into(),
            text: text.into(),
        }
    }
}
