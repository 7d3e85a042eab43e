//! HTTP reading model
//!
//! Encodes a (question, chunk) pair with the model's tokenizer, sends it to a
//! TensorFlow Serving `:predict` endpoint, and turns the returned logits into
//! a [`ModelEvaluation`].

use super::protocol::{build_request, decode_prediction};
use super::tokenizer::SubwordTokenizer;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use wikiqa_application::{InferenceError, ReadingModel};
use wikiqa_domain::{Chunk, EncodingError, ModelEvaluation, ModelInput, Question, SpanPolicy};

/// [`ReadingModel`] backed by a remote model server
pub struct HttpReadingModel {
    client: reqwest::Client,
    endpoint: String,
    signature_name: String,
    tokenizer: Arc<dyn SubwordTokenizer>,
    span_policy: SpanPolicy,
    request_timeout: Option<Duration>,
}

impl HttpReadingModel {
    pub fn new(
        endpoint: impl Into<String>,
        tokenizer: Arc<dyn SubwordTokenizer>,
    ) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| InferenceError::Unavailable(e.to_string()))?;
        Ok(Self::with_client(client, endpoint, tokenizer))
    }

    /// Create a model sharing an existing client
    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        tokenizer: Arc<dyn SubwordTokenizer>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            signature_name: super::DEFAULT_SIGNATURE_NAME.to_string(),
            tokenizer,
            span_policy: SpanPolicy::default(),
            request_timeout: None,
        }
    }

    pub fn with_signature_name(mut self, signature_name: impl Into<String>) -> Self {
        self.signature_name = signature_name.into();
        self
    }

    pub fn with_span_policy(mut self, span_policy: SpanPolicy) -> Self {
        self.span_policy = span_policy;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Tokenize and assemble the model input for one chunk
    pub fn encode(&self, question: &Question, chunk: &Chunk) -> Result<ModelInput, InferenceError> {
        let question_pieces = self.tokenizer.tokenize(question.content())?;
        let context_pieces = self.tokenizer.tokenize(&chunk.text)?;
        ModelInput::from_pair(
            self.tokenizer.special_tokens(),
            &question_pieces,
            &context_pieces,
        )
        .map_err(|e| match e {
            EncodingError::WindowExceeded { positions, limit } => {
                InferenceError::WindowExceeded { positions, limit }
            }
        })
    }

    async fn predict(&self, input: &ModelInput) -> Result<(Vec<f64>, Vec<f64>), InferenceError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&build_request(&self.signature_name, input));
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Unavailable(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(map_transport_error)?;
        decode_prediction(&body, input.len())
    }
}

fn map_transport_error(error: reqwest::Error) -> InferenceError {
    if error.is_timeout() {
        InferenceError::Timeout
    } else {
        InferenceError::Unavailable(error.to_string())
    }
}

#[async_trait]
impl ReadingModel for HttpReadingModel {
    async fn evaluate(
        &self,
        question: &Question,
        chunk: &Chunk,
    ) -> Result<ModelEvaluation, InferenceError> {
        let input = self.encode(question, chunk)?;
        let (start_scores, end_scores) = self.predict(&input).await?;

        let evaluation =
            ModelEvaluation::from_scores(chunk, &input, start_scores, end_scores, self.span_policy)
                .map_err(|e| InferenceError::Malformed(e.to_string()))?;
        debug!(
            "\"{}\": answer \"{}\" score {:.3}",
            chunk.article_title,
            evaluation.answer(),
            evaluation.combined_score()
        );
        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wikiqa_domain::{SpecialTokens, Subword};

    /// Lower-cases, splits off `?`/`.`, and looks words up in a tiny vocabulary
    struct StubTokenizer {
        specials: SpecialTokens,
    }

    impl StubTokenizer {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                specials: SpecialTokens::bert(),
            })
        }

        fn id(word: &str) -> u32 {
            match word {
                "what" => 2054,
                "is" => 2003,
                "the" => 1996,
                "capital" => 3007,
                "of" => 1997,
                "france" => 2605,
                "paris" => 3000,
                "?" => 1029,
                "." => 1012,
                _ => 100,
            }
        }
    }

    impl SubwordTokenizer for StubTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<Subword>, InferenceError> {
            let mut out = Vec::new();
            for word in text.to_lowercase().split_whitespace() {
                let (stem, punct) = match word.strip_suffix(['?', '.']) {
                    Some(stem) => (stem, Some(&word[stem.len()..])),
                    None => (word, None),
                };
                out.push(Subword::new(Self::id(stem), stem));
                if let Some(p) = punct {
                    out.push(Subword::new(Self::id(p), p));
                }
            }
            Ok(out)
        }

        fn special_tokens(&self) -> &SpecialTokens {
            &self.specials
        }
    }

    const PARIS_ID: u64 = 3000;

    /// Model server that puts the highest logits on the `paris` token
    async fn paris_server(calls: Arc<AtomicUsize>) -> String {
        let base = test_support::serve(move |request| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(request.method, "POST");
            assert!(request.target.ends_with(":predict"));
            assert_eq!(request.header("content-type"), Some("application/json"));

            let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
            assert_eq!(body["signature_name"], "serving_default");
            let ids: Vec<u64> = body["instances"][0]["input_ids"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_u64().unwrap())
                .collect();
            let start: Vec<f64> = ids.iter().map(|&id| if id == PARIS_ID { 6.06 } else { 0.1 }).collect();
            let end: Vec<f64> = ids.iter().map(|&id| if id == PARIS_ID { 7.04 } else { 0.2 }).collect();
            let response = serde_json::json!({
                "predictions": [{"start_logits": start, "end_logits": end}]
            });
            (200, response.to_string())
        })
        .await;
        format!("{base}/v1/models/bert_qa_squad:predict")
    }

    #[tokio::test]
    async fn test_end_to_end_paris() {
        let calls = Arc::new(AtomicUsize::new(0));
        let endpoint = paris_server(Arc::clone(&calls)).await;
        let model = HttpReadingModel::with_client(test_support::client(), endpoint, StubTokenizer::new());

        let question = Question::try_new("What is the capital of France?").unwrap();
        let chunk = Chunk::new("Paris", "Paris is the capital of France.");
        let evaluation = model.evaluate(&question, &chunk).await.unwrap();

        assert_eq!(evaluation.answer(), "paris");
        assert_eq!(evaluation.context_article_title(), "Paris");
        assert_eq!(evaluation.start_score_max(), 6.06);
        assert_eq!(evaluation.end_score_max(), 7.04);
        // [CLS] + 7 question pieces + [SEP] + 7 context pieces + [SEP]
        assert_eq!(evaluation.start_scores().len(), 17);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_through_use_case() {
        use wikiqa_application::{AnswerQuestionUseCase, DocumentRetriever, ReaderConfig, RetrievalError};
        use wikiqa_domain::Document;

        struct FixedRetriever;

        #[async_trait]
        impl DocumentRetriever for FixedRetriever {
            async fn get_articles(
                &self,
                _query: &str,
                _num_articles: usize,
                _characters_per_article: usize,
            ) -> Result<Vec<Document>, RetrievalError> {
                Ok(vec![
                    Document::new("France", "France is a country."),
                    Document::new("Paris", "Paris is the capital of France."),
                ])
            }
        }

        let endpoint = paris_server(Arc::new(AtomicUsize::new(0))).await;
        let model = HttpReadingModel::with_client(test_support::client(), endpoint, StubTokenizer::new());
        let use_case = AnswerQuestionUseCase::new(
            Arc::new(FixedRetriever),
            Arc::new(model),
            ReaderConfig::default(),
        );

        let result = use_case.execute("What is the capital of France?").await.unwrap();

        assert_eq!(result.answer().answer(), "paris");
        assert_eq!(result.answer().context_article_title(), "Paris");
        assert_eq!(result.other_results().len(), 1);
    }

    #[tokio::test]
    async fn test_window_exceeded_never_calls_server() {
        let calls = Arc::new(AtomicUsize::new(0));
        let endpoint = paris_server(Arc::clone(&calls)).await;
        let model = HttpReadingModel::with_client(test_support::client(), endpoint, StubTokenizer::new());

        let question = Question::try_new("What is the capital of France?").unwrap();
        let chunk = Chunk::new("Long", vec!["word"; 600].join(" "));
        let err = model.evaluate(&question, &chunk).await.unwrap_err();

        assert_eq!(
            err,
            InferenceError::WindowExceeded {
                positions: 610,
                limit: 512
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let base = test_support::serve(|_| (500, r#"{"error":"boom"}"#.to_string())).await;
        let model = HttpReadingModel::with_client(test_support::client(), base, StubTokenizer::new());

        let question = Question::try_new("What is the capital of France?").unwrap();
        let err = model
            .evaluate(&question, &Chunk::new("Paris", "Paris."))
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Unavailable(msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_wrong_logit_count_is_malformed() {
        let base = test_support::serve(|_| {
            (
                200,
                r#"{"predictions":[{"start_logits":[1.0],"end_logits":[1.0]}]}"#.to_string(),
            )
        })
        .await;
        let model = HttpReadingModel::with_client(test_support::client(), base, StubTokenizer::new());

        let question = Question::try_new("What is the capital of France?").unwrap();
        let err = model
            .evaluate(&question, &Chunk::new("Paris", "Paris."))
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        let model = HttpReadingModel::with_client(
            test_support::client(),
            "http://127.0.0.1:1/v1/models/qa:predict",
            StubTokenizer::new(),
        );
        let question = Question::try_new("What is the capital of France?").unwrap();
        let err = model
            .evaluate(&question, &Chunk::new("Paris", "Paris."))
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Unavailable(_)));
    }
}
