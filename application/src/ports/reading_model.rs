//! Reading model port
//!
//! Defines the interface to the extractive reader: one call per
//! (question, chunk) pair.

use async_trait::async_trait;
use thiserror::Error;
use wikiqa_domain::{Chunk, ModelEvaluation, Question};

/// Errors that can occur while evaluating one chunk
///
/// All of them are absorbed by the pipeline: the chunk is dropped and the
/// remaining evaluations still take part in the decision.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Inference service unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed inference response: {0}")]
    Malformed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Encoded input has {positions} positions, the model accepts {limit}")]
    WindowExceeded { positions: usize, limit: usize },

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}

/// Extractive reading-comprehension model
#[async_trait]
pub trait ReadingModel: Send + Sync {
    /// Evaluate `chunk` as the context for `question`
    async fn evaluate(
        &self,
        question: &Question,
        chunk: &Chunk,
    ) -> Result<ModelEvaluation, InferenceError>;
}
