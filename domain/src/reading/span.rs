//! Answer span selection and reconstruction.
//!
//! The reader scores every input position as a possible start and end of the
//! answer. The span is the argmax of each vector taken independently, so the
//! predicted end may precede the start; [`SpanPolicy`] decides what that means.

use serde::{Deserialize, Serialize};

/// Prefix marking a WordPiece continuation (`marie` + `##tta` = `marietta`)
pub const CONTINUATION_MARKER: &str = "##";

/// What to do when the predicted end precedes the predicted start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanPolicy {
    /// Collapse the span to the start token
    #[default]
    Clamp,
    /// Produce an empty answer
    Reject,
}

impl SpanPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanPolicy::Clamp => "clamp",
            SpanPolicy::Reject => "reject",
        }
    }
}

impl std::fmt::Display for SpanPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clamp" => Ok(SpanPolicy::Clamp),
            "reject" => Ok(SpanPolicy::Reject),
            other => Err(format!("unknown span policy: {other}")),
        }
    }
}

/// Predicted start and end positions, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSpan {
    pub start: usize,
    pub end: usize,
}

impl AnswerSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Pick the span from start and end score vectors
    pub fn from_scores(start_scores: &[f64], end_scores: &[f64]) -> Option<Self> {
        let (start, _) = argmax(start_scores)?;
        let (end, _) = argmax(end_scores)?;
        Some(Self { start, end })
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }
}

/// Index and value of the first maximum, `None` for an empty slice
pub fn argmax(scores: &[f64]) -> Option<(usize, f64)> {
    let (first, rest) = scores.split_first()?;
    let mut best = (0, *first);
    for (i, &score) in rest.iter().enumerate() {
        if score > best.1 || best.1.is_nan() {
            best = (i + 1, score);
        }
    }
    Some(best)
}

/// Rebuild a readable answer from the pieces of `span`
///
/// Continuation pieces are glued to the previous piece without their marker;
/// every other piece is preceded by a single space. The first piece is kept
/// as is.
pub fn reconstruct_answer(pieces: &[String], span: AnswerSpan, policy: SpanPolicy) -> String {
    if span.start >= pieces.len() {
        return String::new();
    }

    let end = if span.is_inverted() {
        match policy {
            SpanPolicy::Clamp => span.start,
            SpanPolicy::Reject => return String::new(),
        }
    } else {
        span.end.min(pieces.len() - 1)
    };

    let mut answer = pieces[span.start].clone();
    for piece in &pieces[span.start + 1..=end] {
        match piece.strip_prefix(CONTINUATION_MARKER) {
            Some(rest) => answer.push_str(rest),
            None => {
                answer.push(' ');
                answer.push_str(piece);
            }
        }
    }
    answer
}
