//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Question has {token_count} words, the limit is {limit}")]
    QuestionTooLong { token_count: usize, limit: usize },

    #[error(
        "No room left for context: a {question_tokens}-word question with a safety margin of {safety_margin} leaves {remaining} positions"
    )]
    ChunkBudgetExhausted {
        question_tokens: usize,
        safety_margin: usize,
        remaining: i64,
    },

    #[error("No evidence found for the question")]
    NoEvidenceFound,
}
