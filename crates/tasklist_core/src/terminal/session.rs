use super::commands::{self, CommandName, MODE_USAGE};
use super::output::{OutputKind, OutputLog};
use super::parser::{ParsedCommand, parse_command};
use super::pending::PendingInteraction;
use super::recall::CommandRecall;
use crate::store::TaskStore;
use crate::task_api::local_now;
use std::time::{Duration, Instant};

pub const DEFAULT_MODE_SWITCH_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct TerminalSession {
    log: OutputLog,
    recall: CommandRecall,
    pending: PendingInteraction,
    mode_switch_delay: Duration,
    mode_switch_at: Option<Instant>,
}

impl Default for TerminalSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSession {
    pub fn new() -> Self {
        Self::with_mode_switch_delay(DEFAULT_MODE_SWITCH_DELAY)
    }

    pub fn with_mode_switch_delay(mode_switch_delay: Duration) -> Self {
        Self {
            log: OutputLog::new(),
            recall: CommandRecall::new(),
            pending: PendingInteraction::Idle,
            mode_switch_delay,
            mode_switch_at: None,
        }
    }

    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    pub fn pending(&self) -> &PendingInteraction {
        &self.pending
    }

    pub fn is_awaiting_input(&self) -> bool {
        !self.pending.is_idle()
    }

    pub fn recall(&self) -> &CommandRecall {
        &self.recall
    }

    pub fn recall_previous(&mut self) -> Option<&str> {
        self.recall.previous_entry()
    }

    pub fn recall_next(&mut self) -> Option<&str> {
        self.recall.next_entry()
    }

    /// Handles one submitted line to completion.
    ///
    /// While a prompt is open the line is its answer and is neither echoed nor
    /// recorded for recall. Otherwise a non-blank line is echoed, recorded and
    /// dispatched.
    pub fn submit(&mut self, line: &str, store: &mut dyn TaskStore) {
        if !self.pending.is_idle() {
            let pending = std::mem::take(&mut self.pending);
            tracing::debug!(state = pending.label(), "answering pending prompt");
            self.pending = pending.answer(line, store, &mut self.log);
            return;
        }

        if line.trim().is_empty() {
            return;
        }

        self.recall.push(line);
        self.log.push(OutputKind::Command, format!("$ {line}"));
        let command = parse_command(line);
        self.dispatch(&command, store);
        tracing::debug!(
            command = %command.name,
            state = self.pending.label(),
            "handled command"
        );
    }

    fn dispatch(&mut self, command: &ParsedCommand, store: &mut dyn TaskStore) {
        match CommandName::resolve(&command.name) {
            Some(CommandName::Create) => {
                commands::execute_create(command, store, &mut self.log, local_now());
            }
            Some(CommandName::Complete) => {
                self.pending = commands::execute_complete(store.tasks(), &mut self.log);
            }
            Some(CommandName::Drop) => {
                self.pending = commands::execute_drop(store.tasks(), &mut self.log);
            }
            Some(CommandName::Help) => commands::execute_help(&mut self.log),
            Some(CommandName::Mode) => self.execute_mode(command),
            Some(CommandName::Clear) => self.log.clear(),
            None => self.log.error(format!(
                "Unknown command: {}. Type \"help\" for available commands.",
                command.name
            )),
        }
    }

    fn execute_mode(&mut self, command: &ParsedCommand) {
        if command.args.first().map(String::as_str) == Some("gui") {
            self.log.success("Switching to GUI mode...");
            self.mode_switch_at = Some(Instant::now() + self.mode_switch_delay);
        } else {
            self.log.error(MODE_USAGE);
        }
    }

    /// Time left before a requested mode switch is due, if one is armed.
    pub fn mode_switch_due_in(&self, now: Instant) -> Option<Duration> {
        self.mode_switch_at
            .map(|due| due.saturating_duration_since(now))
    }

    /// Fires `on_switch` once the armed mode switch is due.
    ///
    /// Returns whether the callback ran. A session dropped before the
    /// deadline never fires.
    pub fn poll_mode_switch<F: FnOnce()>(&mut self, now: Instant, on_switch: F) -> bool {
        match self.mode_switch_at {
            Some(due) if now >= due => {
                self.mode_switch_at = None;
                on_switch();
                true
            }
            _ => false,
        }
    }
}
