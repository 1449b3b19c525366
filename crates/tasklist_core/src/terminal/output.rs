use crate::task_api::{display_time, local_now};

pub const BANNER: &str = "Terminal Todo Manager v3.0.0 - Type \"help\" for available commands";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Output,
    Error,
    Success,
    Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: OutputKind,
    pub content: String,
    pub timestamp: String,
}

impl OutputLine {
    fn now(kind: OutputKind, content: String) -> Self {
        Self {
            kind,
            content,
            timestamp: display_time(local_now()),
        }
    }
}

/// Append-only display log. The only way to drop lines is [`OutputLog::clear`],
/// which leaves the banner behind and bumps the epoch so renderers know to
/// start over.
#[derive(Debug, Clone)]
pub struct OutputLog {
    lines: Vec<OutputLine>,
    epoch: u64,
}

impl Default for OutputLog {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputLog {
    pub fn new() -> Self {
        Self {
            lines: vec![OutputLine::now(OutputKind::Output, BANNER.to_string())],
            epoch: 0,
        }
    }

    pub fn push<C: Into<String>>(&mut self, kind: OutputKind, content: C) {
        self.lines.push(OutputLine::now(kind, content.into()));
    }

    pub fn output<C: Into<String>>(&mut self, content: C) {
        self.push(OutputKind::Output, content);
    }

    pub fn error<C: Into<String>>(&mut self, content: C) {
        self.push(OutputKind::Error, content);
    }

    pub fn success<C: Into<String>>(&mut self, content: C) {
        self.push(OutputKind::Success, content);
    }

    pub fn clear(&mut self) {
        *self = Self {
            epoch: self.epoch + 1,
            ..Self::new()
        };
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
