/// Previously submitted lines with an up/down cursor.
///
/// `cursor` is `None` while the operator is typing a fresh line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRecall {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl CommandRecall {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<L: Into<String>>(&mut self, line: L) {
        self.entries.push(line.into());
        self.cursor = None;
    }

    /// Steps back one entry, stopping at the oldest.
    pub fn previous_entry(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let index = match self.cursor {
            None => self.entries.len() - 1,
            Some(current) => current.saturating_sub(1),
        };
        self.cursor = Some(index);
        Some(&self.entries[index])
    }

    /// Steps forward one entry. The newest entry is shown on the way forward
    /// rather than skipped; moving past it returns to the fresh line and
    /// yields an empty string.
    pub fn next_entry(&mut self) -> Option<&str> {
        let current = self.cursor?;
        if current + 1 < self.entries.len() {
            self.cursor = Some(current + 1);
            Some(&self.entries[current + 1])
        } else {
            self.cursor = None;
            Some("")
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}
