//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use wikiqa_domain::{DecisionBaseline, OutputFormat as DomainOutputFormat};

/// Output format for answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the answer text
    Answer,
    /// Answer, source article and every other candidate
    Full,
    /// JSON output
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Answer => DomainOutputFormat::Answer,
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// How the best chunk is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecisionArg {
    /// Running best starts at zero; the first chunk wins when nothing scores above it
    Legacy,
    /// Highest combined score always wins
    Best,
}

impl From<DecisionArg> for DecisionBaseline {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Legacy => DecisionBaseline::Zero,
            DecisionArg::Best => DecisionBaseline::BestOfAll,
        }
    }
}

/// CLI arguments for wikiqa
#[derive(Parser, Debug)]
#[command(name = "wikiqa")]
#[command(author, version, about = "Answer questions from Wikipedia with an extractive reader model")]
#[command(long_about = r#"
wikiqa answers a short factual question by reading Wikipedia.

The process has three stages:
1. Retrieval: search Wikipedia and download the top articles
2. Reading: a BERT reader model scores every chunk of every article
3. Decision: the highest-scoring span becomes the answer

The reader model is served over HTTP (TensorFlow Serving :predict API) and
needs a matching tokenizer.json.

Configuration files are loaded from (in priority order):
1. WIKIQA_* environment variables (e.g. WIKIQA_INFERENCE__ENDPOINT)
2. --config <path>     Explicit config file
3. ./wikiqa.toml       Project-level config
4. ~/.config/wikiqa/config.toml   Global config

Example:
  wikiqa --tokenizer ./tokenizer.json "What is the capital of France?"
  wikiqa -n 3 -o full "Who wrote Dracula?"
  wikiqa -i
"#)]
pub struct Cli {
    /// The question to answer (not required in interactive mode)
    pub question: Option<String>,

    /// Start interactive mode
    #[arg(short, long)]
    pub interactive: bool,

    /// Number of Wikipedia articles to read
    #[arg(short = 'n', long, value_name = "N")]
    pub articles: Option<usize>,

    /// Characters kept from the start of each article
    #[arg(long, value_name = "N")]
    pub characters: Option<usize>,

    /// Model server `:predict` URL
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Path to the model's tokenizer.json
    #[arg(long, value_name = "PATH")]
    pub tokenizer: Option<PathBuf>,

    /// Maximum number of concurrent model calls
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Answer selection rule
    #[arg(long, value_enum)]
    pub decision: Option<DecisionArg>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_question_with_flags() {
        let cli = Cli::try_parse_from([
            "wikiqa",
            "-n",
            "3",
            "--decision",
            "best",
            "-o",
            "json",
            "-vv",
            "What is the capital of France?",
        ])
        .unwrap();

        assert_eq!(cli.question.as_deref(), Some("What is the capital of France?"));
        assert_eq!(cli.articles, Some(3));
        assert_eq!(cli.decision, Some(DecisionArg::Best));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_unknown_decision_rejected() {
        assert!(Cli::try_parse_from(["wikiqa", "--decision", "vote", "q"]).is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(DecisionBaseline::from(DecisionArg::Legacy), DecisionBaseline::Zero);
        assert_eq!(DomainOutputFormat::from(OutputFormat::Full), DomainOutputFormat::Full);
    }
}
