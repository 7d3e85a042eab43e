//! Stages of one answer-question run

use serde::{Deserialize, Serialize};

/// Stage of the answering pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Fetching candidate documents
    Retrieval,
    /// Running the reader over every chunk
    Reading,
    /// Choosing the best evaluation
    Decision,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Retrieval => "retrieval",
            Stage::Reading => "reading",
            Stage::Decision => "decision",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Stage::Retrieval => "Retrieving articles",
            Stage::Reading => "Reading chunks",
            Stage::Decision => "Choosing answer",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
