//! Progress reporting for deliberation rounds

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use deliberate_application::{ProgressNotifier, Stage};
use deliberate_domain::RoundRecord;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with indicatif bars, one per stage
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
    round_reports: bool,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
            round_reports: false,
        }
    }

    /// Print a report after every completed round
    pub fn with_round_reports(mut self, enabled: bool) -> Self {
        self.round_reports = enabled;
        self
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn stage_display_name(stage: Stage) -> &'static str {
        match stage {
            Stage::Route => "Routing",
            Stage::Gate => "Gating experts",
            Stage::Execute => "Collecting answers",
            Stage::Judge => "Judging",
            Stage::Summarize => "Summarizing",
            Stage::MetaEvaluate => "Meta-critic",
        }
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.stage_bar.lock().ok().and_then(|mut bar| bar.take())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_round_start(&self, round: u32, max_rounds: u32) {
        let _ = self.multi.println(format!(
            "{} {}",
            "->".cyan(),
            format!("Round {} of {}", round, max_rounds).bold()
        ));
    }

    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        if let Some(previous) = self.take_bar() {
            previous.finish_and_clear();
        }

        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(format!("{} {}", stage.emoji(), Self::stage_display_name(stage)));
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.stage_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_task_complete(&self, _stage: Stage, name: &str, success: bool) {
        if let Ok(bar) = self.stage_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), name)
            } else {
                format!("{} {}", "x".red(), name)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: Stage) {
        if let Some(pb) = self.take_bar() {
            pb.finish_with_message(format!("{} done", stage.as_str().green()));
        }
    }

    fn on_round_complete(&self, record: &RoundRecord) {
        if self.round_reports {
            let _ = self.multi.println(ConsoleFormatter::format_round(record));
        }
    }
}

/// Plain line-based progress on stderr (no bars)
#[derive(Default)]
pub struct SimpleProgress {
    round_reports: bool,
}

impl SimpleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_round_reports(mut self, enabled: bool) -> Self {
        self.round_reports = enabled;
        self
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: u32, max_rounds: u32) {
        eprintln!("{} Round {} of {}", "->".cyan(), round, max_rounds);
    }

    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        eprintln!(
            "  {} {} ({} tasks)",
            stage.emoji(),
            ProgressReporter::stage_display_name(stage).bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _stage: Stage, name: &str, success: bool) {
        if success {
            eprintln!("    {} {}", "v".green(), name);
        } else {
            eprintln!("    {} {} (failed)", "x".red(), name);
        }
    }

    fn on_stage_complete(&self, _stage: Stage) {}

    fn on_round_complete(&self, record: &RoundRecord) {
        if self.round_reports {
            eprintln!("{}", ConsoleFormatter::format_round(record));
        }
    }
}
