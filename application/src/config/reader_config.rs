//! Reader configuration for the answer use case.
//!
//! [`ReaderConfig`] groups the static parameters of
//! [`AnswerQuestionUseCase`](crate::use_cases::answer_question::AnswerQuestionUseCase).
//! It is read-only once the use case is built and may be shared across
//! concurrent questions.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use wikiqa_domain::{DecisionBaseline, TokenBudget};

/// Answer pipeline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Number of documents to retrieve per question.
    pub num_articles: usize,
    /// Characters kept from the start of each document.
    pub characters_per_article: usize,
    /// Chunk size computation.
    pub budget: TokenBudget,
    /// How the decider seeds its running maximum.
    pub decision: DecisionBaseline,
    /// Maximum number of inference calls in flight.
    pub max_concurrency: usize,
    /// Timeout for each inference call.
    pub inference_timeout: Option<Duration>,
    /// Timeout for the retrieval call.
    pub retrieval_timeout: Option<Duration>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            num_articles: 5,
            characters_per_article: 2500,
            budget: TokenBudget::default(),
            decision: DecisionBaseline::default(),
            max_concurrency: 4,
            inference_timeout: Some(Duration::from_secs(30)),
            retrieval_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ReaderConfig {
    // ==================== Builder Methods ====================

    pub fn with_num_articles(mut self, n: usize) -> Self {
        self.num_articles = n;
        self
    }

    pub fn with_characters_per_article(mut self, n: usize) -> Self {
        self.characters_per_article = n;
        self
    }

    pub fn with_safety_margin(mut self, margin: usize) -> Self {
        self.budget = TokenBudget::new(margin);
        self
    }

    pub fn with_decision(mut self, decision: DecisionBaseline) -> Self {
        self.decision = decision;
        self
    }

    /// Set the concurrency limit (at least one call is always allowed)
    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n.max(1);
        self
    }

    pub fn with_inference_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.inference_timeout = timeout;
        self
    }

    pub fn with_retrieval_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.retrieval_timeout = timeout;
        self
    }
}
