//! Token budget for the reader model's context window.

use crate::core::error::DomainError;
use crate::core::question::Question;
use crate::document::chunker::Chunker;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Maximum number of input positions the reader model accepts
pub const MAX_MODEL_WINDOW: usize = 512;

/// Positions taken by `[CLS]` and the two `[SEP]` markers
pub const SPECIAL_POSITIONS: usize = 3;

/// Default allowance for the sub-word tokenizer producing more pieces than
/// the whitespace split counts.
pub const DEFAULT_SAFETY_MARGIN: usize = 200;

/// Computes the per-question chunk size (Value Object)
///
/// `chunk_size = MAX_MODEL_WINDOW - SPECIAL_POSITIONS - question words - safety_margin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBudget {
    safety_margin: usize,
}

impl TokenBudget {
    pub fn new(safety_margin: usize) -> Self {
        Self { safety_margin }
    }

    pub fn safety_margin(&self) -> usize {
        self.safety_margin
    }

    /// Number of context words available next to `question`
    pub fn chunk_size_for(&self, question: &Question) -> Result<NonZeroUsize, DomainError> {
        let question_tokens = question.token_count();
        let remaining = MAX_MODEL_WINDOW as i64
            - SPECIAL_POSITIONS as i64
            - question_tokens as i64
            - self.safety_margin as i64;

        usize::try_from(remaining)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or(DomainError::ChunkBudgetExhausted {
                question_tokens,
                safety_margin: self.safety_margin,
                remaining,
            })
    }

    /// Chunker sized for `question`
    pub fn chunker_for(&self, question: &Question) -> Result<Chunker, DomainError> {
        self.chunk_size_for(question).map(Chunker::new)
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self::new(DEFAULT_SAFETY_MARGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(words: usize) -> Question {
        Question::try_new(vec!["word"; words].join(" ")).unwrap()
    }

    #[test]
    fn test_default_budget() {
        let budget = TokenBudget::default();
        let size = budget.chunk_size_for(&question(6)).unwrap();
        assert_eq!(size.get(), 512 - 3 - 6 - 200);
    }

    #[test]
    fn test_budget_follows_question_length() {
        let budget = TokenBudget::new(0);
        assert_eq!(budget.chunk_size_for(&question(1)).unwrap().get(), 508);
        assert_eq!(budget.chunk_size_for(&question(15)).unwrap().get(), 494);
    }

    #[test]
    fn test_last_positive_budget() {
        let budget = TokenBudget::new(512 - 3 - 2 - 1);
        assert_eq!(budget.chunk_size_for(&question(2)).unwrap().get(), 1);
    }

    #[test]
    fn test_exhausted_budget() {
        let budget = TokenBudget::new(507);
        let err = budget.chunk_size_for(&question(2)).unwrap_err();
        assert_eq!(
            err,
            DomainError::ChunkBudgetExhausted {
                question_tokens: 2,
                safety_margin: 507,
                remaining: 0,
            }
        );

        let err = TokenBudget::new(600).chunk_size_for(&question(2)).unwrap_err();
        assert!(matches!(
            err,
            DomainError::ChunkBudgetExhausted { remaining, .. } if remaining < 0
        ));
    }

    #[test]
    fn test_chunker_for() {
        let chunker = TokenBudget::new(500).chunker_for(&question(4)).unwrap();
        assert_eq!(chunker.chunk_size(), 5);
    }
}
