//! CLI command definitions

use clap::{Parser, ValueEnum};
use deliberate_application::DeliberationParams;
use deliberate_domain::RoundMode;
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Per-round report followed by the final answer
    Full,
    /// Only the final answer
    Answer,
    /// Outcome and trace as JSON
    Json,
}

impl From<OutputFormat> for deliberate_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => deliberate_domain::OutputFormat::Full,
            OutputFormat::Answer => deliberate_domain::OutputFormat::Answer,
            OutputFormat::Json => deliberate_domain::OutputFormat::Json,
        }
    }
}

/// Round mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Explore,
    Verify,
    Attack,
    Plan,
}

impl From<ModeArg> for RoundMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Explore => RoundMode::Explore,
            ModeArg::Verify => RoundMode::Verify,
            ModeArg::Attack => RoundMode::Attack,
            ModeArg::Plan => RoundMode::Plan,
        }
    }
}

/// CLI arguments for deliberate
#[derive(Parser, Debug)]
#[command(name = "deliberate")]
#[command(author, version, about = "Multi-round deliberation by a panel of LLM experts")]
#[command(long_about = r#"
deliberate puts a question before a panel of LLM experts and runs rounds until
a meta-critic calls irreducible truth, a contradiction, or the round budget
runs out.

Each round:
1. Route: classify the question (analytic, creative, critical, plan)
2. Gate: every expert says whether it should answer, and how confidently
3. Select: pick a diverse top-k of the confident experts
4. Judge: rank the answers and keep the winner
5. Meta-evaluate: decide whether to stop and hand out hints

The model is taken from DELIBERATE_LM (provider/model, default
openai/gpt-4o-mini). Keys come from DELIBERATE_API_KEY or the provider's own
variable (OPENAI_API_KEY, ANTHROPIC_API_KEY, ...).

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. ./deliberate.toml      Project-level config
3. ~/.config/deliberate/config.toml   Global config

Example:
  deliberate "Is P = NP provable in ZFC?"
  deliberate --mode attack --max-rounds 5 "Our cache is always consistent"
  deliberate                       (interactive mode)
"#)]
pub struct Cli {
    /// The question to deliberate (omit for interactive mode)
    pub question: Option<String>,

    /// Session goal
    #[arg(long, value_name = "TEXT")]
    pub goal: Option<String>,

    /// Round mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Maximum rounds per question
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Experts selected per round
    #[arg(long, value_name = "K")]
    pub top_k: Option<usize>,

    /// Minimum gate confidence for an expert to be considered
    #[arg(long, value_name = "CONF")]
    pub gate_min_conf: Option<f64>,

    /// Diversity weight of the selector
    #[arg(long, value_name = "LAMBDA")]
    pub gate_lambda: Option<f64>,

    /// JSON file to load and save accumulated hints
    #[arg(long, value_name = "PATH")]
    pub hints_cache: Option<PathBuf>,

    /// Keep and print the candidate block sent to the judge
    #[arg(long)]
    pub print_judge_payload: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and per-round reports
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Directory for the diagnostic log file
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Write a JSONL log of every round to this file
    #[arg(long, value_name = "PATH")]
    pub conversation_log: Option<PathBuf>,
}

impl Cli {
    /// Layer command-line overrides on top of configured parameters.
    pub fn apply_to(&self, params: DeliberationParams) -> DeliberationParams {
        let mut params = params;
        if let Some(max_rounds) = self.max_rounds {
            params = params.with_max_rounds(max_rounds);
        }
        if let Some(top_k) = self.top_k {
            params = params.with_top_k(top_k);
        }
        if let Some(conf) = self.gate_min_conf {
            params = params.with_gate_min_conf(conf);
        }
        if let Some(lambda) = self.gate_lambda {
            params = params.with_gate_lambda(lambda);
        }
        if self.print_judge_payload {
            params = params.with_judge_payload(true);
        }
        params
    }
}
