//! CLI entrypoint for deliberate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use deliberate_application::{
    HintStore, NoHintStore, NoProgress, ProgressNotifier, RunDeliberationError,
    RunDeliberationInput, RunDeliberationUseCase, restore_hints, save_hints,
};
use deliberate_domain::{ExpertRegistry, OrchestratorState, Query, RoundMode};
use deliberate_infrastructure::{
    ChatCompletionsGateway, ConfigLoader, FileConfig, JsonHintStore, JsonlConversationLogger,
    ProviderSettings, llm_collaborators,
};
use deliberate_presentation::{
    ChatRepl, Cli, ConsoleFormatter, OutputConfig, ProgressReporter, ReplConfig, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit code when the provider refuses for quota or rate reasons
const EXIT_QUOTA: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::config_sources(cli.config.as_ref()) {
            println!("{}", line);
        }
        if cli.no_config {
            println!("(--no-config: configuration files are skipped)");
        }
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| config.logging.dir.as_ref().map(PathBuf::from));
    let _log_guard = init_logging(cli.verbose, log_dir);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<RunDeliberationError>() {
            Some(run_error) => {
                eprintln!("{}", ConsoleFormatter::format_error(run_error));
                if run_error.is_quota_exhausted() {
                    ExitCode::from(EXIT_QUOTA)
                } else {
                    ExitCode::FAILURE
                }
            }
            None => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("could not load configuration files")?
    };

    let issues = config.validate();
    if !issues.is_empty() {
        bail!("{}", issues.join("; "));
    }
    Ok(config)
}

/// Initialize logging based on verbosity level; `RUST_LOG` wins when no
/// `-v` flag is given. The returned guard flushes the log file on drop.
fn init_logging(verbose: u8, log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = if verbose == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "deliberate.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

async fn run(cli: Cli, config: FileConfig) -> Result<()> {
    ConsoleFormatter::set_color_enabled(config.output.color && !cli.no_color);

    let params = cli.apply_to(config.deliberation.to_params());
    params
        .validate()
        .map_err(RunDeliberationError::InvalidParams)?;

    // Provider problems stop here, before any round runs
    let settings = ProviderSettings::from_env(&config.provider)?;
    info!("Starting deliberate with model {}", settings.model_id());

    // === Dependency Injection ===
    let gateway = Arc::new(ChatCompletionsGateway::new(settings)?);
    let collaborators = llm_collaborators(gateway);
    let registry = Arc::new(ExpertRegistry::default_panel());

    let mut state = OrchestratorState::for_registry(&registry);
    if let Some(goal) = &config.deliberation.goal {
        state.set_goal(goal.as_str());
    }
    if let Some(mode) = config.deliberation.mode {
        state.set_mode(mode);
    }

    let hints_path = cli
        .hints_cache
        .clone()
        .or_else(|| config.hints.cache.as_ref().map(PathBuf::from));
    let hint_store: Arc<dyn HintStore> = match hints_path {
        Some(path) => Arc::new(JsonHintStore::new(path)),
        None => Arc::new(NoHintStore),
    };
    if restore_hints(hint_store.as_ref(), &mut state) {
        info!("Restored hints from cache");
    }

    let mut use_case = RunDeliberationUseCase::new(collaborators, Arc::clone(&registry), params);

    let conversation_log = cli
        .conversation_log
        .clone()
        .or_else(|| config.logging.conversation_log.as_ref().map(PathBuf::from));
    if let Some(path) = conversation_log {
        match JsonlConversationLogger::new(&path) {
            Some(logger) => use_case = use_case.with_conversation_logger(Arc::new(logger)),
            None => warn!("Conversation log disabled"),
        }
    }

    let output = OutputConfig {
        format: cli
            .output
            .map(Into::into)
            .or(config.output.format)
            .unwrap_or_default(),
        verbose_rounds: config.output.verbose_rounds,
    };
    let mode: Option<RoundMode> = cli.mode.map(Into::into);

    // Interactive mode
    let Some(question) = cli.question.clone() else {
        let repl_config = ReplConfig {
            show_progress: config.repl.show_progress,
            history_file: config.repl.history_file.as_ref().map(PathBuf::from),
        };
        let mut repl = ChatRepl::new(use_case, state, hint_store)
            .with_output(output)
            .with_config(repl_config)
            .with_goal(cli.goal.clone())
            .with_mode(mode)
            .with_quiet(cli.quiet);
        repl.run().await?;
        return Ok(());
    };

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });
    let use_case = use_case.with_cancellation(token);

    let mut input = RunDeliberationInput::new(Query::try_new(question)?);
    if let Some(goal) = &cli.goal {
        input = input.with_goal(goal.clone());
    }
    if let Some(mode) = mode {
        input = input.with_mode(mode);
    }

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new().with_round_reports(output.live_round_reports()))
    } else {
        Box::new(SimpleProgress::new().with_round_reports(output.live_round_reports()))
    };

    let result = use_case
        .execute_with_progress(&mut state, input, progress.as_ref())
        .await;
    save_hints(hint_store.as_ref(), &state);

    let outcome = result?;
    println!("{}", ConsoleFormatter::render(output.format, &outcome));

    Ok(())
}
