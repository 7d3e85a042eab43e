//! Output formatter trait

use wikiqa_domain::{AnswerResult, OutputFormat};

/// Trait for formatting answer results
pub trait OutputFormatter {
    /// Format the answer with its source and every other candidate
    fn format(&self, result: &AnswerResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &AnswerResult) -> String;

    /// Format the answer text only (concise output)
    fn format_answer_only(&self, result: &AnswerResult) -> String;

    /// Format in the requested style
    fn render(&self, result: &AnswerResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Answer => self.format_answer_only(result),
            OutputFormat::Full => self.format(result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}
