use crate::actions::execute_task_command;
use crate::cli::{BoardCommand, BoardLine, split_command_line};
use crate::render;
use clap::{CommandFactory, Parser};
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};
use tasklist_core::config::{Config, Palette, StartMode};
use tasklist_core::error::AppError;
use tasklist_core::model::Category;
use tasklist_core::store::TaskStore;
use tasklist_core::task_api::{self, StatusFilter, local_now};
use tasklist_core::terminal::TerminalSession;

const TERMINAL_PROMPT: &str = "user@terminal:~/todo$ ";
const BOARD_PROMPT: &str = "> ";
const BOARD_BANNER: &str = "Liquid Terminal ToDo Manager v3.0.0 - card view. Type \"help\" for commands, \"terminal\" for the command line";

/// A terminal-mode session plus how much of its log has been printed.
struct TerminalView {
    session: TerminalSession,
    rendered: usize,
    epoch: u64,
}

impl TerminalView {
    fn new(mode_switch_delay: Duration) -> Self {
        Self {
            session: TerminalSession::with_mode_switch_delay(mode_switch_delay),
            rendered: 0,
            epoch: 0,
        }
    }

    fn flush<W: Write>(&mut self, out: &mut W, palette: &Palette) -> Result<(), AppError> {
        let log = self.session.log();
        if log.epoch() != self.epoch {
            self.epoch = log.epoch();
            self.rendered = 0;
        }
        for line in &log.lines()[self.rendered..] {
            writeln!(out, "{}", render::output_line(line, palette))?;
        }
        self.rendered = log.len();
        out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct BoardView {
    status: StatusFilter,
    category: Option<Category>,
}

enum BoardFlow {
    Continue,
    Exit,
    SwitchToTerminal,
}

impl BoardView {
    fn enter<W: Write>(&self, store: &dyn TaskStore, out: &mut W) -> Result<(), AppError> {
        writeln!(out, "{BOARD_BANNER}")?;
        self.show(store, out)
    }

    fn show<W: Write>(&self, store: &dyn TaskStore, out: &mut W) -> Result<(), AppError> {
        let tasks = store.tasks();
        writeln!(out, "{}", render::stats_line(&task_api::stats(tasks)))?;
        let visible = task_api::filter_tasks(tasks, self.status, self.category);
        writeln!(
            out,
            "{}",
            render::task_cards(&visible, self.status, self.category)
        )?;
        Ok(())
    }

    fn handle<W: Write>(
        &mut self,
        line: &str,
        store: &mut dyn TaskStore,
        out: &mut W,
    ) -> Result<BoardFlow, AppError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(BoardFlow::Continue);
        }
        if is_exit(trimmed) {
            return Ok(BoardFlow::Exit);
        }
        if trimmed == "help" || trimmed == "?" {
            writeln!(out, "{}", BoardLine::command().render_help())?;
            return Ok(BoardFlow::Continue);
        }

        let parsed = split_command_line(trimmed)
            .and_then(|args| BoardLine::try_parse_from(args).map_err(normalize_parse_error));
        let command = match parsed {
            Ok(line) => line.command,
            Err(err) => {
                writeln!(out, "ERROR: {err}")?;
                return Ok(BoardFlow::Continue);
            }
        };

        match command {
            BoardCommand::Terminal => return Ok(BoardFlow::SwitchToTerminal),
            BoardCommand::Filter { status, category } => {
                self.status = status;
                self.category = category;
                self.show(store, out)?;
            }
            BoardCommand::Task(task_command) => {
                match execute_task_command(task_command, store.tasks(), local_now()) {
                    Ok(outcome) => {
                        writeln!(out, "{}", render::report_plain(&outcome.report))?;
                        if let Some(updated) = outcome.updated {
                            store.replace_all(updated);
                            self.show(store, out)?;
                        }
                    }
                    Err(err) => writeln!(out, "ERROR: {err}")?,
                }
            }
        }

        Ok(BoardFlow::Continue)
    }
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

fn prompt<W: Write>(out: &mut W, show: bool, text: &str) -> Result<(), AppError> {
    if show {
        write!(out, "{text}")?;
        out.flush()?;
    }
    Ok(())
}

/// Drives the interactive front-ends until `exit`, `quit` or end of input.
///
/// Terminal mode hands every line to a [`TerminalSession`]; the card view
/// parses lines as [`BoardLine`]s. `mode gui` and `terminal` move between the
/// two, and each entry into terminal mode starts a fresh session.
pub fn run_interactive<R: BufRead, W: Write>(
    store: &mut dyn TaskStore,
    config: &Config,
    start: StartMode,
    show_prompt: bool,
    mut input: R,
    out: &mut W,
) -> Result<(), AppError> {
    let palette = config.palette();
    let mut board = BoardView::default();
    let mut terminal = match start {
        StartMode::Terminal => {
            let mut view = TerminalView::new(config.mode_switch_delay());
            view.flush(out, &palette)?;
            Some(view)
        }
        StartMode::Gui => {
            board.enter(store, out)?;
            None
        }
    };

    let mut raw = Vec::new();
    loop {
        match terminal.as_ref() {
            Some(view) if view.session.is_awaiting_input() => {}
            Some(_) => prompt(out, show_prompt, TERMINAL_PROMPT)?,
            None => prompt(out, show_prompt, BOARD_PROMPT)?,
        }

        raw.clear();
        if input.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&raw);
        let submitted = line.trim_end_matches(['\n', '\r']);

        if let Some(view) = terminal.as_mut() {
            if !view.session.is_awaiting_input() && is_exit(submitted.trim()) {
                break;
            }
            view.session.submit(submitted, store);
            view.flush(out, &palette)?;

            if let Some(wait) = view.session.mode_switch_due_in(Instant::now()) {
                std::thread::sleep(wait);
                let mut switched = false;
                view.session
                    .poll_mode_switch(Instant::now(), || switched = true);
                if switched {
                    tracing::debug!("switching to card view");
                    terminal = None;
                    board.enter(store, out)?;
                }
            }
            continue;
        }

        match board.handle(submitted, store, out)? {
            BoardFlow::Continue => {}
            BoardFlow::Exit => break,
            BoardFlow::SwitchToTerminal => {
                tracing::debug!("switching to terminal");
                let mut view = TerminalView::new(config.mode_switch_delay());
                view.flush(out, &palette)?;
                terminal = Some(view);
            }
        }
    }

    out.flush()?;
    Ok(())
}
