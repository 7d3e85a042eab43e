//! Answer Question use case
//!
//! Orchestrates the full answering flow:
//!
//! | Stage        | Work                                                     |
//! |--------------|----------------------------------------------------------|
//! | (validation) | word limit and chunk budget, before any I/O              |
//! | Retrieval    | fetch `num_articles` documents                           |
//! | Reading      | one inference call per chunk, bounded fan-out            |
//! | Decision     | best `start_score_max + end_score_max` across all chunks |
//!
//! Chunks whose inference call fails or times out are dropped; the decision is
//! made from whatever succeeded. Evaluations are always kept in
//! document-then-chunk order, independent of completion order, so tie-breaking
//! is reproducible.

use crate::config::ReaderConfig;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::reading_model::{InferenceError, ReadingModel};
use crate::ports::retrieval::{DocumentRetriever, RetrievalError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wikiqa_domain::{
    AnswerResult, Chunk, Decider, Document, DomainError, ModelEvaluation, Question, Stage,
};

/// Errors that can occur while answering a question
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnswerQuestionError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Question is too long ({token_count} words, limit {limit}); try a shorter question")]
    QuestionTooLong { token_count: usize, limit: usize },

    #[error(
        "Question leaves no room for context ({question_tokens} words, safety margin {safety_margin})"
    )]
    ChunkBudgetExhausted {
        question_tokens: usize,
        safety_margin: usize,
    },

    #[error("Document retrieval failed: {0}")]
    RetrievalFailed(#[from] RetrievalError),

    #[error("No answer found")]
    NoEvidenceFound,

    #[error("Operation cancelled")]
    Cancelled,
}

/// What the caller should do about a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    /// The question itself is unusable; ask a different one
    Rephrase,
    /// A backing service is down or misbehaving
    ServiceUnavailable,
    /// Everything worked but nothing answered the question
    NoAnswer,
    /// The caller gave up
    Cancelled,
}

impl AnswerQuestionError {
    pub fn category(&self) -> FailureCategory {
        match self {
            AnswerQuestionError::InvalidQuestion(_)
            | AnswerQuestionError::QuestionTooLong { .. }
            | AnswerQuestionError::ChunkBudgetExhausted { .. } => FailureCategory::Rephrase,
            AnswerQuestionError::RetrievalFailed(_) => FailureCategory::ServiceUnavailable,
            AnswerQuestionError::NoEvidenceFound => FailureCategory::NoAnswer,
            AnswerQuestionError::Cancelled => FailureCategory::Cancelled,
        }
    }
}

impl From<DomainError> for AnswerQuestionError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidQuestion(msg) => AnswerQuestionError::InvalidQuestion(msg),
            DomainError::QuestionTooLong { token_count, limit } => {
                AnswerQuestionError::QuestionTooLong { token_count, limit }
            }
            DomainError::ChunkBudgetExhausted {
                question_tokens,
                safety_margin,
                ..
            } => AnswerQuestionError::ChunkBudgetExhausted {
                question_tokens,
                safety_margin,
            },
            DomainError::NoEvidenceFound => AnswerQuestionError::NoEvidenceFound,
        }
    }
}

/// Outcome of one spawned inference task
type ChunkOutcome = (usize, String, Result<ModelEvaluation, InferenceError>);

/// Use case for answering a question from retrieved documents
pub struct AnswerQuestionUseCase<R: DocumentRetriever + 'static, M: ReadingModel + 'static> {
    retriever: Arc<R>,
    reader: Arc<M>,
    config: ReaderConfig,
    cancellation_token: Option<CancellationToken>,
}

impl<R: DocumentRetriever + 'static, M: ReadingModel + 'static> Clone
    for AnswerQuestionUseCase<R, M>
{
    fn clone(&self) -> Self {
        Self {
            retriever: Arc::clone(&self.retriever),
            reader: Arc::clone(&self.reader),
            config: self.config.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl<R: DocumentRetriever + 'static, M: ReadingModel + 'static> AnswerQuestionUseCase<R, M> {
    pub fn new(retriever: Arc<R>, reader: Arc<M>, config: ReaderConfig) -> Self {
        Self {
            retriever,
            reader,
            config,
            cancellation_token: None,
        }
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, question: &str) -> Result<AnswerResult, AnswerQuestionError> {
        self.execute_with_progress(question, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        question: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<AnswerResult, AnswerQuestionError> {
        // Cheap checks first: retrieval and inference are the expensive part.
        let question = Question::try_new(question)?;
        question.ensure_within_limit()?;
        let chunker = self.config.budget.chunker_for(&question)?;

        info!(
            "Answering \"{}\" ({} words, chunk size {})",
            question,
            question.token_count(),
            chunker.chunk_size()
        );

        let documents = self.retrieve(&question, progress).await?;

        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| chunker.chunk_document(doc))
            .collect();
        debug!(
            "{} documents split into {} chunks",
            documents.len(),
            chunks.len()
        );

        let evaluations = self.read_chunks(&question, chunks, progress).await?;

        progress.on_stage_start(Stage::Decision, 1);
        let result = Decider::new(self.config.decision).decide(evaluations, &question);
        progress.on_task_complete(Stage::Decision, question.content(), result.is_ok());
        progress.on_stage_complete(Stage::Decision);

        let result = result?;
        info!(
            "Answer \"{}\" from \"{}\" (score {:.3}, {} chunks evaluated)",
            result.answer().answer(),
            result.answer().context_article_title(),
            result.answer().combined_score(),
            result.evaluated_chunks()
        );
        Ok(result)
    }

    /// Stage 1: fetch the candidate documents
    async fn retrieve(
        &self,
        question: &Question,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<Document>, AnswerQuestionError> {
        self.check_cancelled()?;
        info!("Stage: {}", Stage::Retrieval);
        progress.on_stage_start(Stage::Retrieval, self.config.num_articles);

        let lookup = self.retriever.get_articles(
            question.content(),
            self.config.num_articles,
            self.config.characters_per_article,
        );
        let lookup = async {
            match self.config.retrieval_timeout {
                Some(limit) => tokio::time::timeout(limit, lookup)
                    .await
                    .unwrap_or(Err(RetrievalError::Timeout)),
                None => lookup.await,
            }
        };

        let documents = match &self.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    progress.on_stage_complete(Stage::Retrieval);
                    return Err(AnswerQuestionError::Cancelled);
                }
                result = lookup => result,
            },
            None => lookup.await,
        };

        let documents = match documents {
            Ok(documents) => documents,
            Err(e) => {
                warn!("Retrieval failed: {}", e);
                progress.on_stage_complete(Stage::Retrieval);
                return Err(e.into());
            }
        };

        for doc in &documents {
            progress.on_task_complete(Stage::Retrieval, &doc.title, true);
        }
        progress.on_stage_complete(Stage::Retrieval);
        info!("Retrieved {} documents", documents.len());
        Ok(documents)
    }

    /// Stage 2: evaluate every chunk, keeping the successful evaluations in order
    async fn read_chunks(
        &self,
        question: &Question,
        chunks: Vec<Chunk>,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<ModelEvaluation>, AnswerQuestionError> {
        self.check_cancelled()?;
        info!("Stage: {}", Stage::Reading);
        let total = chunks.len();
        progress.on_stage_start(Stage::Reading, total);

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut join_set: JoinSet<ChunkOutcome> = JoinSet::new();

        for (index, chunk) in chunks.into_iter().enumerate() {
            let reader = Arc::clone(&self.reader);
            let semaphore = Arc::clone(&semaphore);
            let question = question.clone();
            let timeout = self.config.inference_timeout;

            join_set.spawn(async move {
                // Tasks aborted while waiting here never reach the model.
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => Self::evaluate_chunk(&reader, &question, &chunk, timeout).await,
                    Err(_) => Err(InferenceError::Unavailable(
                        "inference pool closed".to_string(),
                    )),
                };
                (index, chunk.article_title, result)
            });
        }

        let mut slots: Vec<Option<ModelEvaluation>> = vec![None; total];
        let mut failed = 0usize;

        loop {
            let joined = match &self.cancellation_token {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        progress.on_stage_complete(Stage::Reading);
                        return Err(AnswerQuestionError::Cancelled);
                    }
                    joined = join_set.join_next() => joined,
                },
                None => join_set.join_next().await,
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((index, title, Ok(evaluation))) => {
                    debug!("Chunk {} of \"{}\" evaluated", index, title);
                    progress.on_task_complete(Stage::Reading, &title, true);
                    slots[index] = Some(evaluation);
                }
                Ok((index, title, Err(e))) => {
                    warn!("Chunk {} of \"{}\" dropped: {}", index, title, e);
                    progress.on_task_complete(Stage::Reading, &title, false);
                    failed += 1;
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                    progress.on_task_complete(Stage::Reading, "chunk task", false);
                    failed += 1;
                }
            }
        }

        progress.on_stage_complete(Stage::Reading);

        let evaluations: Vec<ModelEvaluation> = slots.into_iter().flatten().collect();
        if failed > 0 {
            warn!("{} of {} chunks could not be evaluated", failed, total);
        }
        info!("Evaluated {} of {} chunks", evaluations.len(), total);
        Ok(evaluations)
    }

    /// Evaluate a single chunk, applying the per-call timeout
    async fn evaluate_chunk(
        reader: &M,
        question: &Question,
        chunk: &Chunk,
        timeout: Option<std::time::Duration>,
    ) -> Result<ModelEvaluation, InferenceError> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, reader.evaluate(question, chunk))
                .await
                .unwrap_or(Err(InferenceError::Timeout)),
            None => reader.evaluate(question, chunk).await,
        }
    }

    fn check_cancelled(&self) -> Result<(), AnswerQuestionError> {
        if let Some(token) = &self.cancellation_token
            && token.is_cancelled()
        {
            return Err(AnswerQuestionError::Cancelled);
        }
        Ok(())
    }
}
