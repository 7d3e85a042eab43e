//! Progress reporting while a question is answered

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use wikiqa_application::ProgressNotifier;
use wikiqa_domain::{Stage, ellipsize};

/// Longest task label shown next to a bar
const LABEL_CHARS: usize = 40;

/// Reports progress with one bar per stage
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_short_name(stage: Stage) -> &'static str {
        match stage {
            Stage::Retrieval => "Retrieval",
            Stage::Reading => "Reading",
            Stage::Decision => "Decision",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(stage.display_name().to_string());
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.stage_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_task_complete(&self, _stage: Stage, label: &str, success: bool) {
        if let Ok(bar) = self.stage_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let label = ellipsize(label, LABEL_CHARS);
            let status = if success {
                format!("{} {}", "v".green(), label)
            } else {
                format!("{} {}", "x".red(), label)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: Stage) {
        if let Ok(mut bar) = self.stage_bar.lock()
            && let Some(pb) = bar.take()
        {
            let name = Self::stage_short_name(stage);
            pb.finish_with_message(format!("{} complete!", name.green()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tracks_one_stage_at_a_time() {
        let reporter = ProgressReporter::new();
        reporter.on_stage_start(Stage::Reading, 2);
        reporter.on_task_complete(Stage::Reading, "Paris", true);
        reporter.on_task_complete(Stage::Reading, "France", false);
        {
            let bar = reporter.stage_bar.lock().unwrap();
            assert_eq!(bar.as_ref().map(|pb| pb.position()), Some(2));
        }
        reporter.on_stage_complete(Stage::Reading);
        assert!(reporter.stage_bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_task_without_stage_is_ignored() {
        let reporter = ProgressReporter::new();
        reporter.on_task_complete(Stage::Retrieval, "Paris", true);
        reporter.on_stage_complete(Stage::Retrieval);
    }
}
