//! Question value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Maximum number of whitespace-separated words a question may contain
pub const MAX_QUESTION_TOKENS: usize = 15;

/// A question to be answered (Value Object)
///
/// The content is kept verbatim; only its whitespace word count matters to
/// the pipeline, since it feeds the chunk budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
}

impl Question {
    /// Try to create a new question, rejecting empty or blank content
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question cannot be empty".to_string(),
            ));
        }
        Ok(Self { content })
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of whitespace-separated words
    pub fn token_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Reject questions over [`MAX_QUESTION_TOKENS`] words
    pub fn ensure_within_limit(&self) -> Result<(), DomainError> {
        let token_count = self.token_count();
        if token_count > MAX_QUESTION_TOKENS {
            return Err(DomainError::QuestionTooLong {
                token_count,
                limit: MAX_QUESTION_TOKENS,
            });
        }
        Ok(())
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl std::str::FromStr for Question {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Question::try_new(s)
    }
}
