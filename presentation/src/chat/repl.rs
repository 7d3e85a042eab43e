//! REPL (Read-Eval-Print Loop) for interactive questions

use crate::config::{OutputConfig, ReplConfig};
use crate::output::console::ConsoleFormatter;
use crate::output::formatter::OutputFormatter;
use crate::progress::reporter::ProgressReporter;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use tokio_util::sync::CancellationToken;
use wikiqa_application::{AnswerQuestionUseCase, DocumentRetriever, ReadingModel};
use wikiqa_domain::{MAX_QUESTION_TOKENS, OutputFormat};

const HISTORY_CAPACITY: usize = 1000;

/// Interactive question REPL
pub struct ChatRepl<R: DocumentRetriever + 'static, M: ReadingModel + 'static> {
    use_case: AnswerQuestionUseCase<R, M>,
    output: OutputConfig,
    repl: ReplConfig,
}

impl<R: DocumentRetriever + 'static, M: ReadingModel + 'static> ChatRepl<R, M> {
    /// Create a new ChatRepl
    pub fn new(use_case: AnswerQuestionUseCase<R, M>) -> Self {
        Self {
            use_case,
            output: OutputConfig::default(),
            repl: ReplConfig::default(),
        }
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn with_repl_config(mut self, repl: ReplConfig) -> Self {
        self.repl = repl;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();

        if let Some(path) = &self.repl.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => eprintln!("History disabled: {}", e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("wikiqa".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                _ => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        let config = self.use_case.config();
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          wikiqa - Interactive Mode          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Reading {} articles ({} characters each), up to {} words per question",
            config.num_articles, config.characters_per_article, MAX_QUESTION_TOKENS
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?        - Show this help");
        println!("  /format answer|full|json - Change output format");
        println!("  /config              - Show current settings");
        println!("  /quit, /exit, /q     - Exit");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        let mut parts = cmd.split_whitespace();
        match (parts.next().unwrap_or_default(), parts.next()) {
            ("/quit" | "/exit" | "/q", _) => {
                println!("Bye!");
                true
            }
            ("/help" | "/h" | "/?", _) => {
                println!();
                Self::print_help();
                false
            }
            ("/format", Some(value)) => {
                match value.parse::<OutputFormat>() {
                    Ok(format) => {
                        self.output.format = format;
                        println!("Output format: {}", format);
                    }
                    Err(e) => println!("{}", e),
                }
                false
            }
            ("/format", None) => {
                println!("Output format: {}", self.output.format);
                false
            }
            ("/config", _) => {
                let config = self.use_case.config();
                println!();
                println!("  articles:          {}", config.num_articles);
                println!("  characters:        {}", config.characters_per_article);
                println!("  safety margin:     {}", config.budget.safety_margin());
                println!("  decision:          {}", config.decision.as_str());
                println!("  concurrency:       {}", config.max_concurrency);
                println!("  output:            {}", self.output.format);
                println!();
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_question(&self, question: &str) {
        println!();

        // Ctrl-C while a question is running cancels that question only.
        let token = CancellationToken::new();
        let use_case = self.use_case.clone().with_cancellation(token.clone());
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });

        let result = if self.repl.show_progress {
            let progress = ProgressReporter::new();
            use_case.execute_with_progress(question, &progress).await
        } else {
            use_case.execute(question).await
        };
        watcher.abort();

        match result {
            Ok(result) => {
                println!("{}", ConsoleFormatter.render(&result, self.output.format));
            }
            Err(e) => {
                eprintln!("{}", ConsoleFormatter::format_error(&e));
            }
        }
        println!();
    }
}
