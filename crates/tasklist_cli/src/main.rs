use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tasklist_cli::actions::execute_task_command;
use tasklist_cli::app::{normalize_parse_error, run_interactive};
use tasklist_cli::cli::{Cli, Command, TaskCommand, collect_config_overrides};
use tasklist_cli::logging;
use tasklist_cli::render;
use tasklist_core::config::{Config, StartMode, load_config_with_fallback, merge_overrides};
use tasklist_core::error::AppError;
use tasklist_core::storage::{JsonFileStore, json_store};
use tasklist_core::task_api::local_now;

fn resolve_config(raw_overrides: &[String]) -> Result<Config, AppError> {
    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        eprintln!("WARNING: using default config ({err})");
    }
    let overrides = collect_config_overrides(raw_overrides)?;
    Ok(merge_overrides(&loaded.config, &overrides))
}

fn run_task_command(path: &Path, command: TaskCommand, json: bool) -> Result<(), AppError> {
    let tasks = json_store::load_tasks(path)?;
    let outcome = execute_task_command(command, &tasks, local_now())?;
    if let Some(updated) = outcome.updated.as_ref() {
        json_store::save_tasks(path, updated)?;
    }

    if json {
        println!("{}", render::report_json(&outcome.report));
    } else {
        println!("{}", render::report_plain(&outcome.report));
    }
    Ok(())
}

fn run_session(path: PathBuf, config: &Config, start: StartMode) -> Result<(), AppError> {
    let mut store = JsonFileStore::open(path);
    let stdin = io::stdin();
    let show_prompt = stdin.is_terminal();
    let mut stdout = io::stdout().lock();
    run_interactive(
        &mut store,
        config,
        start,
        show_prompt,
        stdin.lock(),
        &mut stdout,
    )
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli.config_override)?;
    let path = match cli.store {
        Some(path) => path,
        None => json_store::store_path()?,
    };
    tracing::debug!(path = %path.display(), "using task store");

    match cli.command {
        None => run_session(path, &config, config.start_mode()),
        Some(Command::Terminal) => run_session(path, &config, StartMode::Terminal),
        Some(Command::Gui) => run_session(path, &config, StartMode::Gui),
        Some(Command::Task(command)) => run_task_command(&path, command, cli.json),
    }
}

fn main() {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
