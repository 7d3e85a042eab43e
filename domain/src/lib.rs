//! Domain layer for wikiqa
//!
//! This crate contains the core answering logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Chunking
//!
//! A question leaves a fixed number of model positions for context
//! ([`TokenBudget`]). Each retrieved [`Document`] is cut into non-overlapping
//! word windows of that size ([`Chunker`]).
//!
//! ## Reading
//!
//! The reader model scores every position of `[CLS] question [SEP] chunk [SEP]`
//! ([`ModelInput`]) as a possible answer start and end. The argmax positions are
//! turned back into text ([`reconstruct_answer`]) to form a [`ModelEvaluation`].
//!
//! ## Decision
//!
//! The [`Decider`] ranks all evaluations by their summed maxima and returns an
//! [`AnswerResult`].

pub mod config;
pub mod core;
pub mod document;
pub mod reading;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    question::{MAX_QUESTION_TOKENS, Question},
    string::{ellipsize, truncate_chars},
};
pub use document::{
    chunker::{Chunker, Chunks},
    entities::{Chunk, Document},
};
pub use reading::{
    budget::{DEFAULT_SAFETY_MARGIN, MAX_MODEL_WINDOW, SPECIAL_POSITIONS, TokenBudget},
    decider::{DecisionBaseline, Decider},
    encoding::{EncodingError, ModelInput, SpecialTokens, Subword},
    evaluation::{AnswerResult, ModelEvaluation, ScoreError},
    span::{AnswerSpan, CONTINUATION_MARKER, SpanPolicy, argmax, reconstruct_answer},
    stage::Stage,
};
