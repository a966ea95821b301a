//! Planwright - conversational feature planning for existing projects.
//!
//! Each subcommand advances the persisted planning session by one step, so a
//! session can be spread over several shell invocations.

#![allow(clippy::single_match_else)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use planwright::ai::{BackendStatus, GenerationAdapter};
use planwright::context::ContextAggregator;
use planwright::core::{Config, DegradationReason};
use planwright::workflow::{
    AutoConfirm, Confirm, JsonFileStore, NoticeLevel, Phase, PlanSummary, ScaffoldApplier,
    WorkflowEngine, WorkflowError, WorkflowEvent,
};

/// Conversational feature planning for existing projects
#[derive(Parser)]
#[command(name = "planwright")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Directory the session state is stored in
    #[arg(long, global = true, env = "PLANWRIGHT_STATE_DIR", value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Never contact the reasoning backend
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start planning a feature request
    Start {
        /// The feature request
        #[arg(required = true, num_args = 1..)]
        request: Vec<String>,
    },

    /// Answer the next clarification question
    Answer {
        /// The answer
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Generate the plan from the answers
    Submit,

    /// Apply the plan to the project
    Execute {
        /// Don't confirm before applying
        #[arg(short = 'y', long)]
        yes: bool,

        /// Check every item without changing any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Discard the current session
    Restart {
        /// Don't confirm before discarding
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the session and backend status
    Status {
        /// Re-check the reasoning backend
        #[arg(long)]
        refresh: bool,
    },

    /// Print the current plan
    Plan {
        /// Print as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },

    /// Show the context that would be sent to the backend
    Context {
        /// Directory to analyze (defaults to the project root)
        path: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    Config {
        /// Print the config directory instead
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Confirms on stdin.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(_) => input.trim().eq_ignore_ascii_case("y"),
            Err(_) => false,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let config = Config::load_for_project(&project_root(&cli)?)?;

    match &cli.command {
        Commands::Start { request } => cmd_start(&cli, &config, &request.join(" ")),
        Commands::Answer { text } => cmd_answer(&cli, &config, &text.join(" ")),
        Commands::Submit => cmd_submit(&cli, &config),
        Commands::Execute { yes, dry_run } => cmd_execute(&cli, &config, *yes, *dry_run),
        Commands::Restart { yes } => cmd_restart(&cli, &config, *yes),
        Commands::Status { refresh } => cmd_status(&cli, &config, *refresh),
        Commands::Plan { json } => cmd_plan(&cli, &config, *json),
        Commands::Context { path, json } => cmd_context(&cli, &config, path.as_deref(), *json),
        Commands::Config { path } => cmd_config(&config, *path),
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            Ok(())
        }
    }
}

/// Project root from `--root` or the current directory.
fn project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.root {
        Some(root) => Ok(root.clone()),
        None => Ok(std::env::current_dir()?),
    }
}

/// Connect to the backend unless running offline.
async fn connect_adapter(cli: &Cli, config: &Config, root: &Path) -> GenerationAdapter {
    if cli.offline {
        return GenerationAdapter::offline(DegradationReason::Disabled);
    }
    GenerationAdapter::connect(&config.ai, Some(root))
        .await
        .with_excerpt_chars(config.context.excerpt_chars)
}

/// Build an engine over the persisted session.
fn open_engine(
    cli: &Cli,
    config: &Config,
    adapter: GenerationAdapter,
    skip_confirm: bool,
) -> Result<WorkflowEngine> {
    let root = project_root(cli)?;
    let state_dir = cli.state_dir.clone().unwrap_or_else(|| config.state_dir());
    let store = JsonFileStore::new(state_dir, &config.workflow.session_key);

    let confirm: Box<dyn Confirm> = if skip_confirm || !config.general.confirm {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(StdinConfirm)
    };

    Ok(WorkflowEngine::new(Box::new(store), adapter)
        .with_root(root)
        .with_aggregator(ContextAggregator::new(config.context.clone()))
        .with_settings(config.general.clone())
        .with_confirm(confirm))
}

/// Engine for steps that never generate anything.
fn open_local_engine(cli: &Cli, config: &Config, skip_confirm: bool) -> Result<WorkflowEngine> {
    open_engine(cli, config, GenerationAdapter::offline(DegradationReason::Disabled), skip_confirm)
}

/// Print queued engine events.
fn print_events(engine: &WorkflowEngine) {
    for event in engine.poll_events() {
        match event {
            WorkflowEvent::ItemApplied { file, action, error: None } => {
                println!("  ✓ {} {}", action.icon(), file);
            }
            WorkflowEvent::ItemApplied { file, action, error: Some(error) } => {
                println!("  ✗ {} {}: {}", action.icon(), file, error);
            }
            WorkflowEvent::Notice { level: NoticeLevel::Info, message } => {
                println!("{message}");
            }
            WorkflowEvent::Notice { level: NoticeLevel::Warning, message } => {
                eprintln!("Warning: {message}");
            }
            WorkflowEvent::Notice { level: NoticeLevel::Error, message } => {
                eprintln!("Error: {message}");
            }
            WorkflowEvent::PhaseChanged { from, to } => {
                tracing::debug!(%from, %to, "Phase changed");
            }
            WorkflowEvent::QuestionProgress { .. }
            | WorkflowEvent::PlanReady(_)
            | WorkflowEvent::ExecutionFinished { .. } => {}
        }
    }
}

/// Treat a declined confirmation as a normal exit.
fn cancelled_ok<T>(result: Result<T, WorkflowError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(WorkflowError::Cancelled) => {
            println!("Cancelled");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Start a planning session.
fn cmd_start(cli: &Cli, config: &Config, request: &str) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let root = project_root(cli)?;
        let adapter = connect_adapter(cli, config, &root).await;
        let mut engine = open_engine(cli, config, adapter, false)?;

        let result = engine.start(request).await;
        print_events(&engine);
        let questions = result?;

        println!("Planning: {}\n", engine.state().user_request);
        println!("Clarification questions:");
        for (i, question) in questions.iter().enumerate() {
            println!("  {}. {}", i + 1, question);
        }
        println!("\nAnswer each with `planwright answer <text>`.");
        Ok(())
    })
}

/// Record an answer.
fn cmd_answer(cli: &Cli, config: &Config, text: &str) -> Result<()> {
    let mut engine = open_local_engine(cli, config, false)?;

    let result = engine.answer(text);
    print_events(&engine);
    let progress = result?;

    println!("Recorded answer {}/{}.", progress.answered, progress.total);
    match engine.state().pending_question() {
        Some(next) => println!("Next: {next}"),
        None => println!("Run `planwright submit` to generate the plan."),
    }
    Ok(())
}

/// Generate the plan.
fn cmd_submit(cli: &Cli, config: &Config) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let root = project_root(cli)?;
        let adapter = connect_adapter(cli, config, &root).await;
        let mut engine = open_engine(cli, config, adapter, false)?;

        let result = engine.submit().await;
        print_events(&engine);
        let plan = result?;

        println!("Plan for: {}\n", engine.state().user_request);
        for item in &plan {
            println!("  {} {:<40} {}", item.action.icon(), item.file, item.description);
        }
        println!("\n{} items: {}", plan.len(), PlanSummary::from_items(&plan));
        println!("Run `planwright execute` to apply it.");
        Ok(())
    })
}

/// Apply the plan.
fn cmd_execute(cli: &Cli, config: &Config, yes: bool, dry_run: bool) -> Result<()> {
    let mut engine = open_local_engine(cli, config, yes)?;
    let mut applier = ScaffoldApplier::new(project_root(cli)?).dry_run(dry_run);

    if dry_run {
        println!("[DRY RUN] No files will be changed");
    }

    let result = engine.execute(&mut applier);
    print_events(&engine);
    let Some(report) = cancelled_ok(result)? else {
        return Ok(());
    };

    println!("\nApplied {}/{} changes.", report.succeeded(), report.total());
    if !report.is_successful() {
        eprintln!(
            "{} item(s) failed; the session has been reset.",
            report.total() - report.succeeded()
        );
    }
    Ok(())
}

/// Discard the session.
fn cmd_restart(cli: &Cli, config: &Config, yes: bool) -> Result<()> {
    let mut engine = open_local_engine(cli, config, yes)?;

    let result = engine.restart();
    print_events(&engine);
    cancelled_ok(result)?;
    Ok(())
}

/// Show session status.
fn cmd_status(cli: &Cli, config: &Config, refresh: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let root = project_root(cli)?;
        let adapter = connect_adapter(cli, config, &root).await;
        let mut engine = open_engine(cli, config, adapter, false)?;

        if refresh {
            engine.refresh_backend().await;
        }
        print_events(&engine);

        let status = engine.status();
        println!("Phase:    {}", status.phase);
        if status.phase != Phase::Idle {
            println!("Request:  {}", status.request);
            println!("Answers:  {}/{}", status.answered, status.questions);
        }
        if status.phase == Phase::Ready {
            println!("Plan:     {} ({} items)", status.plan, status.plan.total());
        }
        if status.can_submit {
            println!("Ready to submit.");
        }

        match &status.backend {
            BackendStatus::Ready { provider, source: Some(source) } => {
                println!("Backend:  {provider} (key from {source})");
            }
            BackendStatus::Ready { provider, source: None } => println!("Backend:  {provider}"),
            BackendStatus::Fallback(reason) => {
                println!("Backend:  built-in suggestions ({reason})");
                if let Some(hint) = reason.recovery_hint() {
                    println!("          {hint}");
                }
            }
        }
        Ok(())
    })
}

/// Print the current plan.
fn cmd_plan(cli: &Cli, config: &Config, json: bool) -> Result<()> {
    let engine = open_local_engine(cli, config, false)?;
    print_events(&engine);

    if engine.phase() != Phase::Ready {
        anyhow::bail!("No plan yet (workflow is {})", engine.phase());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&engine.state().plan)?);
    } else if let Some(markdown) = engine.plan_markdown() {
        print!("{markdown}");
    }
    Ok(())
}

/// Show project context.
fn cmd_context(cli: &Cli, config: &Config, path: Option<&Path>, json: bool) -> Result<()> {
    let root = match path {
        Some(path) => path.to_path_buf(),
        None => project_root(cli)?,
    };

    let aggregator = ContextAggregator::new(config.context.clone());
    let context = aggregator.analyze(&root)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&context)?);
        return Ok(());
    }

    println!("{}\n", context.summarize());
    if !context.key_files.is_empty() {
        println!("Key files:");
        for file in &context.key_files {
            println!("  {} ({}, {} bytes)", file.path, file.language, file.size);
        }
        println!();
    }
    print!("{}", context.structure);
    Ok(())
}

/// Show configuration.
fn cmd_config(config: &Config, show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::config_dir() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let mut shown = config.clone();
    if shown.ai.api_key.is_some() {
        shown.ai.api_key = Some("[REDACTED]".to_string());
    }

    let toml = toml::to_string_pretty(&shown)?;
    println!("{toml}");
    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "planwright", &mut io::stdout());
}
