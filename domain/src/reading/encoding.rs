//! Encoding of a (question, context) pair for a BERT-style reader.
//!
//! ```text
//! position:   0     1..=q    q+1    q+2..      last
//! piece:      [CLS] question [SEP]  context    [SEP]
//! segment:    0     0        0      1          1
//! attention:  1     1        1      1          1
//! ```

use super::budget::MAX_MODEL_WINDOW;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while assembling the model input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Encoded input has {positions} positions, the model accepts {limit}")]
    WindowExceeded { positions: usize, limit: usize },
}

/// One sub-word token: vocabulary id and its surface piece (e.g. `##tta`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subword {
    pub id: u32,
    pub piece: String,
}

impl Subword {
    pub fn new(id: u32, piece: impl Into<String>) -> Self {
        Self {
            id,
            piece: piece.into(),
        }
    }
}

/// The leading and separator markers of the model's vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTokens {
    pub cls: Subword,
    pub sep: Subword,
}

impl SpecialTokens {
    /// Standard BERT uncased vocabulary ids
    pub fn bert() -> Self {
        Self {
            cls: Subword::new(101, "[CLS]"),
            sep: Subword::new(102, "[SEP]"),
        }
    }
}

/// A fully assembled single-example model input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInput {
    input_ids: Vec<u32>,
    token_type_ids: Vec<u32>,
    attention_mask: Vec<u32>,
    pieces: Vec<String>,
}

impl ModelInput {
    /// Assemble `[CLS] question [SEP] context [SEP]`
    pub fn from_pair(
        specials: &SpecialTokens,
        question: &[Subword],
        context: &[Subword],
    ) -> Result<Self, EncodingError> {
        let positions = question.len() + context.len() + 3;
        if positions > MAX_MODEL_WINDOW {
            return Err(EncodingError::WindowExceeded {
                positions,
                limit: MAX_MODEL_WINDOW,
            });
        }

        let tokens = std::iter::once(&specials.cls)
            .chain(question)
            .chain(std::iter::once(&specials.sep))
            .chain(context)
            .chain(std::iter::once(&specials.sep));

        let mut input_ids = Vec::with_capacity(positions);
        let mut pieces = Vec::with_capacity(positions);
        for token in tokens {
            input_ids.push(token.id);
            pieces.push(token.piece.clone());
        }

        // Question segment runs through the first separator.
        let question_len = question.len() + 2;
        let mut token_type_ids = vec![0; question_len];
        token_type_ids.resize(positions, 1);

        Ok(Self {
            input_ids,
            token_type_ids,
            attention_mask: vec![1; positions],
            pieces,
        })
    }

    pub fn input_ids(&self) -> &[u32] {
        &self.input_ids
    }

    pub fn token_type_ids(&self) -> &[u32] {
        &self.token_type_ids
    }

    pub fn attention_mask(&self) -> &[u32] {
        &self.attention_mask
    }

    pub fn pieces(&self) -> &[String] {
        &self.pieces
    }

    /// Index of the separator between question and context
    pub fn separator_index(&self) -> usize {
        self.token_type_ids.iter().take_while(|&&t| t == 0).count() - 1
    }

    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str], first_id: u32) -> Vec<Subword> {
        ws.iter()
            .enumerate()
            .map(|(i, w)| Subword::new(first_id + i as u32, *w))
            .collect()
    }

    #[test]
    fn test_layout() {
        let question = words(&["what", "is", "the", "capital", "of", "france", "?"], 2000);
        let context = words(&["paris", "is", "the", "capital", "."], 3000);
        let input = ModelInput::from_pair(&SpecialTokens::bert(), &question, &context).unwrap();

        assert_eq!(input.len(), 7 + 5 + 3);
        assert_eq!(input.input_ids()[0], 101);
        assert_eq!(input.input_ids()[8], 102);
        assert_eq!(*input.input_ids().last().unwrap(), 102);
        assert_eq!(input.separator_index(), 8);
        assert_eq!(input.pieces()[9], "paris");
    }

    #[test]
    fn test_segment_vector() {
        let question = words(&["who", "?"], 10);
        let context = words(&["nobody", "knows", "."], 20);
        let input = ModelInput::from_pair(&SpecialTokens::bert(), &question, &context).unwrap();

        assert_eq!(input.token_type_ids(), &[0, 0, 0, 0, 1, 1, 1, 1]);
        assert_eq!(input.attention_mask(), &[1; 8]);
    }

    #[test]
    fn test_empty_context() {
        let question = words(&["why"], 10);
        let input = ModelInput::from_pair(&SpecialTokens::bert(), &question, &[]).unwrap();
        assert_eq!(input.pieces(), &["[CLS]", "why", "[SEP]", "[SEP]"]);
        assert_eq!(input.token_type_ids(), &[0, 0, 0, 1]);
    }

    #[test]
    fn test_window_limit() {
        let question = vec![Subword::new(1, "q"); 9];
        let fits = vec![Subword::new(2, "c"); MAX_MODEL_WINDOW - 12];
        assert!(ModelInput::from_pair(&SpecialTokens::bert(), &question, &fits).is_ok());

        let too_long = vec![Subword::new(2, "c"); MAX_MODEL_WINDOW - 11];
        assert_eq!(
            ModelInput::from_pair(&SpecialTokens::bert(), &question, &too_long),
            Err(EncodingError::WindowExceeded {
                positions: MAX_MODEL_WINDOW + 1,
                limit: MAX_MODEL_WINDOW,
            })
        );
    }
}
