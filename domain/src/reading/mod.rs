//! Reading comprehension over document chunks.
//!
//! Everything here is pure: the model server itself is reached through the
//! application layer's `ReadingModel` port.
//!
//! - [`budget::TokenBudget`] - how many context words fit next to a question
//! - [`encoding::ModelInput`] - `[CLS] question [SEP] context [SEP]` encoding
//! - [`span`] - argmax span selection and sub-word answer reconstruction
//! - [`evaluation::ModelEvaluation`] / [`evaluation::AnswerResult`] - results
//! - [`decider::Decider`] - picks the best evaluation across all chunks
//! - [`stage::Stage`] - pipeline stages reported to progress observers

pub mod budget;
pub mod decider;
pub mod encoding;
pub mod evaluation;
pub mod span;
pub mod stage;
