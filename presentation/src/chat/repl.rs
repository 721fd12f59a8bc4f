//! REPL (Read-Eval-Print Loop) for interactive deliberation

use crate::config::{OutputConfig, ReplConfig};
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ProgressReporter;
use colored::Colorize;
use deliberate_application::{
    HintStore, NoProgress, ProgressNotifier, RunDeliberationInput, RunDeliberationUseCase,
    save_hints,
};
use deliberate_domain::{OrchestratorState, Query, RoundMode};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// Lines that end the session
pub fn is_exit_command(line: &str) -> bool {
    matches!(
        line.trim().to_lowercase().as_str(),
        "" | "q" | "quit" | "exit" | "esc" | "/q" | "/quit" | "/exit"
    )
}

/// Interactive deliberation REPL
pub struct ChatRepl {
    use_case: RunDeliberationUseCase,
    state: OrchestratorState,
    hint_store: Arc<dyn HintStore>,
    output: OutputConfig,
    config: ReplConfig,
    goal: Option<String>,
    mode: Option<RoundMode>,
    quiet: bool,
}

impl ChatRepl {
    pub fn new(
        use_case: RunDeliberationUseCase,
        state: OrchestratorState,
        hint_store: Arc<dyn HintStore>,
    ) -> Self {
        Self {
            use_case,
            state,
            hint_store,
            output: OutputConfig::default(),
            config: ReplConfig::default(),
            goal: None,
            mode: None,
            quiet: false,
        }
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Goal applied to every question
    pub fn with_goal(mut self, goal: Option<String>) -> Self {
        self.goal = goal;
        self
    }

    /// Mode applied to every question
    pub fn with_mode(mut self, mode: Option<RoundMode>) -> Self {
        self.mode = mode;
        self
    }

    /// Suppress progress and round reports
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Session state after the questions asked so far
    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut line_editor = Reedline::create();
        if let Some(path) = self.history_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => warn!("Could not open history file {}: {}", path.display(), e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("deliberate".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if is_exit_command(line) {
                        println!("Bye!");
                        break;
                    }
                    if line.starts_with('/') {
                        self.handle_command(line);
                        continue;
                    }
                    self.process_question(line).await;
                }
                _ => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn history_path(&self) -> Option<PathBuf> {
        self.config
            .history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("deliberate").join("history.txt")))
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│         deliberate - interactive mode       │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Panel: {}",
            self.use_case
                .registry()
                .iter()
                .map(|e| e.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("Goal: {}", self.goal.as_deref().unwrap_or(self.state.goal()));
        println!();
        println!("Ask a question, or an empty line / q / quit / exit to leave.");
        println!("Commands: /help, /hints");
        println!();
    }

    fn handle_command(&self, cmd: &str) {
        match cmd {
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?     - Show this help");
                println!("  /hints            - Show accumulated hints");
                println!("  /quit, /exit, /q  - Exit");
                println!();
            }
            "/hints" => {
                println!();
                let guidance = self.state.router_guidance();
                if !guidance.is_empty() {
                    println!("{}", "Router guidance:".cyan().bold());
                    println!("{}", ConsoleFormatter::indent(guidance, "  "));
                }
                for (role, hint) in self.state.expert_hints() {
                    if !hint.is_empty() {
                        println!("{}", format!("{}:", role).cyan().bold());
                        println!("{}", ConsoleFormatter::indent(hint, "  "));
                    }
                }
                println!();
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
    }

    async fn process_question(&mut self, question: &str) {
        println!();

        let query = match Query::try_new(question) {
            Ok(query) => query,
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                return;
            }
        };

        let mut input = RunDeliberationInput::new(query);
        if let Some(goal) = &self.goal {
            input = input.with_goal(goal.clone());
        }
        if let Some(mode) = self.mode {
            input = input.with_mode(mode);
        }

        let progress: Box<dyn ProgressNotifier> = if self.quiet || !self.config.show_progress {
            Box::new(NoProgress)
        } else {
            Box::new(ProgressReporter::new().with_round_reports(self.output.live_round_reports()))
        };

        let result = self
            .use_case
            .execute_with_progress(&mut self.state, input, progress.as_ref())
            .await;

        match result {
            Ok(outcome) => {
                println!("{}", ConsoleFormatter::render(self.output.format, &outcome));
            }
            Err(e) => {
                // Quota errors included: report and keep the session going.
                eprintln!("{}", ConsoleFormatter::format_error(&e));
            }
        }

        save_hints(self.hint_store.as_ref(), &self.state);
        println!();
    }
}
