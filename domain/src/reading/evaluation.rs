//! Reading results - immutable value types.
//!
//! - [`ModelEvaluation`] - the reader's output for one (question, chunk) pair
//! - [`AnswerResult`] - the chosen evaluation plus every other one

use super::encoding::ModelInput;
use super::span::{AnswerSpan, SpanPolicy, reconstruct_answer};
use crate::document::entities::Chunk;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Score vectors that cannot be turned into an evaluation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Score vectors are empty")]
    Empty,

    #[error("Expected {positions} scores, got {start} start and {end} end scores")]
    LengthMismatch {
        positions: usize,
        start: usize,
        end: usize,
    },
}

/// The reader's evaluation of one chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEvaluation {
    answer: String,
    context: String,
    context_article_title: String,
    start_index: usize,
    end_index: usize,
    start_score_max: f64,
    end_score_max: f64,
    start_scores: Vec<f64>,
    end_scores: Vec<f64>,
}

impl ModelEvaluation {
    /// Build an evaluation from the model's score vectors for `input`
    ///
    /// Both vectors must have one score per encoded position.
    pub fn from_scores(
        chunk: &Chunk,
        input: &ModelInput,
        start_scores: Vec<f64>,
        end_scores: Vec<f64>,
        policy: SpanPolicy,
    ) -> Result<Self, ScoreError> {
        if start_scores.len() != input.len() || end_scores.len() != input.len() {
            return Err(ScoreError::LengthMismatch {
                positions: input.len(),
                start: start_scores.len(),
                end: end_scores.len(),
            });
        }
        let span = AnswerSpan::from_scores(&start_scores, &end_scores).ok_or(ScoreError::Empty)?;
        let answer = reconstruct_answer(input.pieces(), span, policy);
        Self::from_parts(answer, chunk, span, start_scores, end_scores)
    }

    /// Build an evaluation from an already reconstructed answer
    pub fn from_parts(
        answer: impl Into<String>,
        chunk: &Chunk,
        span: AnswerSpan,
        start_scores: Vec<f64>,
        end_scores: Vec<f64>,
    ) -> Result<Self, ScoreError> {
        let start_score_max = max_score(&start_scores).ok_or(ScoreError::Empty)?;
        let end_score_max = max_score(&end_scores).ok_or(ScoreError::Empty)?;
        Ok(Self {
            answer: answer.into(),
            context: chunk.text.clone(),
            context_article_title: chunk.article_title.clone(),
            start_index: span.start,
            end_index: span.end,
            start_score_max,
            end_score_max,
            start_scores,
            end_scores,
        })
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn context_article_title(&self) -> &str {
        &self.context_article_title
    }

    pub fn span(&self) -> AnswerSpan {
        AnswerSpan::new(self.start_index, self.end_index)
    }

    pub fn start_score_max(&self) -> f64 {
        self.start_score_max
    }

    pub fn end_score_max(&self) -> f64 {
        self.end_score_max
    }

    pub fn start_scores(&self) -> &[f64] {
        &self.start_scores
    }

    pub fn end_scores(&self) -> &[f64] {
        &self.end_scores
    }

    /// `start_score_max + end_score_max`, the quantity the decider ranks by
    pub fn combined_score(&self) -> f64 {
        self.start_score_max + self.end_score_max
    }
}

fn max_score(scores: &[f64]) -> Option<f64> {
    scores.iter().copied().reduce(f64::max)
}

/// Final result of answering one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    question: String,
    answer: ModelEvaluation,
    other_results: Vec<ModelEvaluation>,
}

impl AnswerResult {
    pub fn new(
        question: impl Into<String>,
        answer: ModelEvaluation,
        other_results: Vec<ModelEvaluation>,
    ) -> Self {
        Self {
            question: question.into(),
            answer,
            other_results,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &ModelEvaluation {
        &self.answer
    }

    pub fn other_results(&self) -> &[ModelEvaluation] {
        &self.other_results
    }

    /// Total number of evaluations the decision was made from
    pub fn evaluated_chunks(&self) -> usize {
        self.other_results.len() + 1
    }
}
