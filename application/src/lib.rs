//! Application layer for wikiqa
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ReaderConfig;
pub use ports::{
    progress::{NoProgress, ProgressNotifier},
    reading_model::{InferenceError, ReadingModel},
    retrieval::{DocumentRetriever, RetrievalError},
};
pub use use_cases::answer_question::{
    AnswerQuestionError, AnswerQuestionUseCase, FailureCategory,
};
