//! Sub-word tokenization for the reader model

use std::path::Path;
use tokenizers::Tokenizer;
use wikiqa_application::InferenceError;
use wikiqa_domain::{SpecialTokens, Subword};

/// WordPiece-style tokenizer matching the served model's vocabulary
pub trait SubwordTokenizer: Send + Sync {
    /// Tokenize `text` without adding special tokens
    fn tokenize(&self, text: &str) -> Result<Vec<Subword>, InferenceError>;

    /// The `[CLS]` and `[SEP]` markers of the vocabulary
    fn special_tokens(&self) -> &SpecialTokens;
}

/// [`SubwordTokenizer`] over a Hugging Face `tokenizer.json`
pub struct HfTokenizer {
    inner: Tokenizer,
    specials: SpecialTokens,
}

impl HfTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let inner = Tokenizer::from_file(path).map_err(|e| {
            InferenceError::Tokenizer(format!("failed to load {}: {}", path.display(), e))
        })?;
        Self::from_tokenizer(inner)
    }

    /// Wrap an already loaded tokenizer
    pub fn from_tokenizer(inner: Tokenizer) -> Result<Self, InferenceError> {
        let special = |piece: &str| {
            inner
                .token_to_id(piece)
                .map(|id| Subword::new(id, piece))
                .ok_or_else(|| InferenceError::Tokenizer(format!("vocabulary has no {piece}")))
        };
        let specials = SpecialTokens {
            cls: special("[CLS]")?,
            sep: special("[SEP]")?,
        };
        Ok(Self { inner, specials })
    }
}

impl SubwordTokenizer for HfTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Subword>, InferenceError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| InferenceError::Tokenizer(e.to_string()))?;
        Ok(encoding
            .get_ids()
            .iter()
            .zip(encoding.get_tokens())
            .map(|(id, piece)| Subword::new(*id, piece.as_str()))
            .collect())
    }

    fn special_tokens(&self) -> &SpecialTokens {
        &self.specials
    }
}
