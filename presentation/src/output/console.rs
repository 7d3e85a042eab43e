//! Console output formatter for answer results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use wikiqa_application::{AnswerQuestionError, FailureCategory};
use wikiqa_domain::{AnswerResult, ModelEvaluation, ellipsize};

/// Characters of chunk context shown per candidate
const CONTEXT_PREVIEW_CHARS: usize = 160;

/// Formats answer results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result
    pub fn format(result: &AnswerResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("wikiqa"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            result.question()
        ));

        let best = result.answer();
        output.push_str(&format!("{} {}\n", "Answer:".green().bold(), best.answer()));
        output.push_str(&format!(
            "{} {}\n",
            "Source:".cyan().bold(),
            best.context_article_title()
        ));
        output.push_str(&format!(
            "{} {:.3} (start {:.3} + end {:.3})\n",
            "Score:".cyan().bold(),
            best.combined_score(),
            best.start_score_max(),
            best.end_score_max()
        ));
        output.push_str(&format!(
            "{}\n{}\n",
            "Context:".cyan().bold(),
            Self::indent(&ellipsize(best.context(), CONTEXT_PREVIEW_CHARS), "  ")
        ));

        if !result.other_results().is_empty() {
            output.push_str(&Self::section_header(&format!(
                "Other candidates ({})",
                result.other_results().len()
            )));
            for evaluation in result.other_results() {
                output.push_str(&Self::candidate(evaluation));
            }
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &AnswerResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the answer text only
    pub fn format_answer_only(result: &AnswerResult) -> String {
        result.answer().answer().to_string()
    }

    /// One line per failure category, so scripts and people can tell them apart
    pub fn format_error(error: &AnswerQuestionError) -> String {
        let (title, hint) = match error.category() {
            FailureCategory::Rephrase => ("Please rephrase the question", None),
            FailureCategory::ServiceUnavailable => (
                "Wikipedia could not be reached",
                Some("check your network connection or the [retrieval] endpoint"),
            ),
            FailureCategory::NoAnswer => (
                "No answer found",
                Some("the model server may be down, or no article contained an answer"),
            ),
            FailureCategory::Cancelled => ("Cancelled", None),
        };

        let mut output = format!("{} {}", format!("{}:", title).red().bold(), error);
        if let Some(hint) = hint {
            output.push_str(&format!("\n  {}", hint.dimmed()));
        }
        output
    }

    fn candidate(evaluation: &ModelEvaluation) -> String {
        let answer = if evaluation.answer().is_empty() {
            "(empty span)".dimmed().to_string()
        } else {
            evaluation.answer().to_string()
        };
        format!(
            "\n{} {}\n{}\n",
            format!("── {} ──", evaluation.context_article_title())
                .yellow()
                .bold(),
            format!("[{:.3}]", evaluation.combined_score()).dimmed(),
            Self::indent(&format!("{} {}", "answer:".bold(), answer), "  ")
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &AnswerResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &AnswerResult) -> String {
        Self::format_json(result)
    }

    fn format_answer_only(&self, result: &AnswerResult) -> String {
        Self::format_answer_only(result)
    }
}
