//! CLI entrypoint for wikiqa
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wikiqa_application::{AnswerQuestionError, AnswerQuestionUseCase, FailureCategory};
use wikiqa_infrastructure::{
    ConfigLoader, FileConfig, HfTokenizer, HttpReadingModel, WikipediaRetriever,
};
use wikiqa_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputConfig, OutputFormatter, ProgressReporter, ReplConfig,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting wikiqa");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config error: {}", issue);
        }
        bail!("Invalid configuration ({} problems)", issues.len());
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let tokenizer_path = config
        .inference
        .resolved_tokenizer_path()
        .context("No tokenizer configured. Pass --tokenizer or set inference.tokenizer_path")?;
    let tokenizer = Arc::new(HfTokenizer::from_file(&tokenizer_path)?);

    let retriever = Arc::new(WikipediaRetriever::new(config.retrieval.endpoint.as_str())?);
    let reader = Arc::new(
        HttpReadingModel::new(config.inference.endpoint.as_str(), tokenizer)?
            .with_signature_name(config.inference.signature_name.as_str())
            .with_span_policy(config.reader.parse_span_policy().unwrap_or_default())
            .with_request_timeout(
                config
                    .inference
                    .timeout_seconds
                    .map(std::time::Duration::from_secs),
            ),
    );
    info!(
        "Retrieval endpoint {}, model endpoint {}",
        retriever.endpoint(),
        reader.endpoint()
    );

    let use_case = AnswerQuestionUseCase::new(retriever, reader, config.to_reader_config());

    let output = OutputConfig {
        format: cli
            .output
            .map(Into::into)
            .or(config.output.format)
            .unwrap_or_default(),
        color: config.output.color,
    };

    // Interactive mode
    if cli.interactive {
        let repl_config = ReplConfig {
            show_progress: config.repl.show_progress && !cli.quiet,
            history_file: config.repl.history_path(),
        };
        let mut repl = ChatRepl::new(use_case)
            .with_output(output)
            .with_repl_config(repl_config);

        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single question mode - question is required
    let question = match cli.question {
        Some(q) => q,
        None => bail!("Question is required. Use --interactive for interactive mode."),
    };

    let token = CancellationToken::new();
    let use_case = use_case.with_cancellation(token.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            token.cancel();
        }
    });

    let show_progress = !cli.quiet && config.repl.show_progress;
    let result = if show_progress {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(&question, &progress).await
    } else {
        use_case.execute(&question).await
    };

    match result {
        Ok(result) => {
            println!("{}", ConsoleFormatter.render(&result, output.format));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", ConsoleFormatter::format_error(&e));
            Ok(exit_code(&e))
        }
    }
}

/// Initialize logging based on verbosity level, optionally mirrored to a file
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match &cli.log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Command line flags override every configuration source
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(n) = cli.articles {
        config.retrieval.num_articles = n;
    }
    if let Some(n) = cli.characters {
        config.retrieval.characters_per_article = n;
    }
    if let Some(endpoint) = &cli.endpoint {
        config.inference.endpoint = endpoint.clone();
    }
    if let Some(path) = &cli.tokenizer {
        config.inference.tokenizer_path = Some(path.display().to_string());
    }
    if let Some(n) = cli.concurrency {
        config.inference.max_concurrency = n;
    }
    if let Some(decision) = cli.decision {
        let baseline: wikiqa_domain::DecisionBaseline = decision.into();
        config.reader.decision = baseline.as_str().to_string();
    }
}

fn exit_code(error: &AnswerQuestionError) -> ExitCode {
    match error.category() {
        FailureCategory::Rephrase => ExitCode::from(2),
        FailureCategory::ServiceUnavailable => ExitCode::from(3),
        FailureCategory::NoAnswer => ExitCode::from(4),
        FailureCategory::Cancelled => ExitCode::from(130),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "wikiqa",
            "-n",
            "2",
            "--characters",
            "900",
            "--endpoint",
            "http://gpu:8501/v1/models/qa:predict",
            "--tokenizer",
            "/opt/tokenizer.json",
            "--concurrency",
            "8",
            "--decision",
            "best",
            "question",
        ])
        .unwrap();
        let mut config = FileConfig::default();

        apply_overrides(&mut config, &cli);

        assert_eq!(config.retrieval.num_articles, 2);
        assert_eq!(config.retrieval.characters_per_article, 900);
        assert_eq!(config.inference.endpoint, "http://gpu:8501/v1/models/qa:predict");
        assert_eq!(config.inference.tokenizer_path.as_deref(), Some("/opt/tokenizer.json"));
        assert_eq!(config.inference.max_concurrency, 8);
        assert!(config.validate().is_empty());
        assert_eq!(
            config.to_reader_config().decision,
            wikiqa_domain::DecisionBaseline::BestOfAll
        );
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["wikiqa", "question"]).unwrap();
        let mut config = FileConfig::default();
        apply_overrides(&mut config, &cli);
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_zero_concurrency_flag_fails_validation() {
        let cli = Cli::try_parse_from(["wikiqa", "--concurrency", "0", "question"]).unwrap();
        let mut config = FileConfig::default();
        apply_overrides(&mut config, &cli);
        assert!(!config.validate().is_empty());
    }
}
