//! Cross-chunk answer selection.
//!
//! Every evaluation is ranked by `start_score_max + end_score_max`; the
//! highest wins and ties go to the earliest evaluation.

use super::evaluation::{AnswerResult, ModelEvaluation};
use crate::core::error::DomainError;
use crate::core::question::Question;
use serde::{Deserialize, Serialize};

/// Where the running maximum starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionBaseline {
    /// Seed the running best at index 0 with a score of zero.
    ///
    /// When no evaluation scores above zero the first one is returned, even
    /// if a later one is less negative.
    #[default]
    #[serde(rename = "legacy")]
    Zero,
    /// Seed at negative infinity, so the true maximum always wins
    #[serde(rename = "best")]
    BestOfAll,
}

impl DecisionBaseline {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionBaseline::Zero => "legacy",
            DecisionBaseline::BestOfAll => "best",
        }
    }

    fn seed(&self) -> f64 {
        match self {
            DecisionBaseline::Zero => 0.0,
            DecisionBaseline::BestOfAll => f64::NEG_INFINITY,
        }
    }
}

impl std::fmt::Display for DecisionBaseline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecisionBaseline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" | "zero" => Ok(DecisionBaseline::Zero),
            "best" | "best-of-all" => Ok(DecisionBaseline::BestOfAll),
            other => Err(format!("unknown decision baseline: {other}")),
        }
    }
}

/// Selects the best evaluation among all chunks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Decider {
    baseline: DecisionBaseline,
}

impl Decider {
    pub fn new(baseline: DecisionBaseline) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> DecisionBaseline {
        self.baseline
    }

    /// Index of the winning evaluation, `None` when there are none
    pub fn select_index(&self, evaluations: &[ModelEvaluation]) -> Option<usize> {
        if evaluations.is_empty() {
            return None;
        }

        let mut choice_index = 0;
        let mut choice_score = self.baseline.seed();
        for (i, evaluation) in evaluations.iter().enumerate() {
            let score = evaluation.combined_score();
            if score > choice_score {
                choice_score = score;
                choice_index = i;
            }
        }
        Some(choice_index)
    }

    /// Pick the winner and keep the rest, in order, as `other_results`
    pub fn decide(
        &self,
        mut evaluations: Vec<ModelEvaluation>,
        question: &Question,
    ) -> Result<AnswerResult, DomainError> {
        let index = self
            .select_index(&evaluations)
            .ok_or(DomainError::NoEvidenceFound)?;
        let answer = evaluations.remove(index);
        Ok(AnswerResult::new(question.content(), answer, evaluations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::entities::Chunk;
    use crate::reading::span::AnswerSpan;

    fn eval(title: &str, start_max: f64, end_max: f64) -> ModelEvaluation {
        let chunk = Chunk::new(title, format!("context of {title}"));
        ModelEvaluation::from_parts(
            title,
            &chunk,
            AnswerSpan::new(0, 0),
            vec![start_max],
            vec![end_max],
        )
        .unwrap()
    }

    fn question() -> Question {
        Question::try_new("What is the capital of France?").unwrap()
    }

    fn titles(evals: &[ModelEvaluation]) -> Vec<&str> {
        evals.iter().map(|e| e.context_article_title()).collect()
    }

    #[test]
    fn test_picks_highest_combined_score() {
        let evals = vec![eval("a", 1.0, 1.0), eval("b", 6.0, 7.0), eval("c", 3.0, 3.0)];
        let result = Decider::default().decide(evals, &question()).unwrap();

        assert_eq!(result.answer().context_article_title(), "b");
        assert_eq!(titles(result.other_results()), vec!["a", "c"]);
        assert_eq!(result.question(), "What is the capital of France?");
    }

    #[test]
    fn test_tie_goes_to_first() {
        let evals = vec![eval("a", 1.0, 1.0), eval("b", 2.0, 3.0), eval("c", 3.0, 2.0)];
        let result = Decider::default().decide(evals, &question()).unwrap();
        assert_eq!(result.answer().context_article_title(), "b");
    }

    #[test]
    fn test_other_results_exclude_winner() {
        let evals: Vec<_> = (0..5).map(|i| eval(&format!("e{i}"), i as f64, 1.0)).collect();
        let result = Decider::default().decide(evals, &question()).unwrap();

        assert_eq!(result.other_results().len(), 4);
        assert_eq!(result.evaluated_chunks(), 5);
        assert!(!result.other_results().contains(result.answer()));
        assert_eq!(titles(result.other_results()), vec!["e0", "e1", "e2", "e3"]);
    }

    #[test]
    fn test_zero_baseline_keeps_first_when_all_negative() {
        // Legacy behavior: nothing beats the zero seed, so index 0 wins even
        // though "b" has the highest (least negative) score.
        let evals = vec![eval("a", -5.0, -5.0), eval("b", -0.5, -0.5), eval("c", -2.0, -1.0)];
        let result = Decider::new(DecisionBaseline::Zero).decide(evals, &question()).unwrap();
        assert_eq!(result.answer().context_article_title(), "a");
    }

    #[test]
    fn test_zero_baseline_ignores_non_positive_sums() {
        let evals = vec![eval("a", -1.0, 0.5), eval("b", 1.0, -1.0), eval("c", 0.25, 0.0)];
        let result = Decider::new(DecisionBaseline::Zero).decide(evals, &question()).unwrap();
        assert_eq!(result.answer().context_article_title(), "c");
    }

    #[test]
    fn test_best_of_all_baseline_finds_least_negative() {
        let evals = vec![eval("a", -5.0, -5.0), eval("b", -0.5, -0.5), eval("c", -2.0, -1.0)];
        let result = Decider::new(DecisionBaseline::BestOfAll)
            .decide(evals, &question())
            .unwrap();
        assert_eq!(result.answer().context_article_title(), "b");
        assert_eq!(titles(result.other_results()), vec!["a", "c"]);
    }

    #[test]
    fn test_baselines_agree_on_positive_scores() {
        let evals = vec![eval("a", 1.0, 1.0), eval("b", 4.0, 1.0)];
        let zero = Decider::new(DecisionBaseline::Zero).select_index(&evals);
        let best = Decider::new(DecisionBaseline::BestOfAll).select_index(&evals);
        assert_eq!(zero, Some(1));
        assert_eq!(zero, best);
    }

    #[test]
    fn test_empty_is_no_evidence() {
        let err = Decider::default().decide(vec![], &question()).unwrap_err();
        assert_eq!(err, DomainError::NoEvidenceFound);
    }

    #[test]
    fn test_baseline_parse() {
        assert_eq!("legacy".parse::<DecisionBaseline>().unwrap(), DecisionBaseline::Zero);
        assert_eq!("best".parse::<DecisionBaseline>().unwrap(), DecisionBaseline::BestOfAll);
        assert!("median".parse::<DecisionBaseline>().is_err());
    }
}
