//! Model server configuration from TOML (`[inference]` section)
//!
//! ```toml
//! [inference]
//! endpoint = "http://localhost:8080/v1/models/bert_qa_squad:predict"
//! signature_name = "serving_default"
//! tokenizer_path = "~/models/bert-large-uncased/tokenizer.json"
//! timeout_seconds = 30
//! max_concurrency = 4
//! ```

use crate::inference::DEFAULT_SIGNATURE_NAME;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PREDICT_ENDPOINT: &str = "http://localhost:8080/v1/models/bert_qa_squad:predict";

/// Raw inference configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInferenceConfig {
    /// TensorFlow Serving `:predict` URL
    pub endpoint: String,
    /// Serving signature to invoke
    pub signature_name: String,
    /// Path to a `tokenizer.json` matching the served model
    pub tokenizer_path: Option<String>,
    /// Timeout in seconds for each predict call
    pub timeout_seconds: Option<u64>,
    /// Maximum number of predict calls in flight
    pub max_concurrency: usize,
}

impl Default for FileInferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PREDICT_ENDPOINT.to_string(),
            signature_name: DEFAULT_SIGNATURE_NAME.to_string(),
            tokenizer_path: None,
            timeout_seconds: Some(30),
            max_concurrency: 4,
        }
    }
}

impl FileInferenceConfig {
    /// Tokenizer path with a leading `~` expanded to the home directory
    pub fn resolved_tokenizer_path(&self) -> Option<std::path::PathBuf> {
        let raw = self.tokenizer_path.as_deref()?;
        match raw.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(std::path::PathBuf::from(raw)),
        }
    }
}
