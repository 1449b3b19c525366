use super::output::OutputLog;
use crate::model::Task;
use crate::store::TaskStore;
use crate::task_api::{complete_task, delete_task};

const INVALID_SELECTION: &str = "Invalid selection. Please try again.";

/// A multi-turn prompt waiting for its answer.
///
/// Selection states carry the candidate list as it was when the prompt was
/// printed; the store is matched by id when the answer arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PendingInteraction {
    #[default]
    Idle,
    AwaitingCompletionSelection(Vec<Task>),
    AwaitingDeletionSelection(Vec<Task>),
    AwaitingDeletionConfirmation(Task),
}

impl PendingInteraction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingCompletionSelection(_) => "awaiting_completion_selection",
            Self::AwaitingDeletionSelection(_) => "awaiting_deletion_selection",
            Self::AwaitingDeletionConfirmation(_) => "awaiting_deletion_confirmation",
        }
    }

    /// Consumes one input line as the answer and returns the next state.
    pub fn answer(self, input: &str, store: &mut dyn TaskStore, log: &mut OutputLog) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::AwaitingCompletionSelection(candidates) => {
                let Some(selected) = select(&candidates, input) else {
                    log.error(INVALID_SELECTION);
                    return Self::Idle;
                };
                match complete_task(store.tasks(), &selected.id) {
                    Ok((tasks, _)) => {
                        store.replace_all(tasks);
                        log.success(format!("✓ Completed: \"{}\"", selected.text));
                    }
                    Err(err) => {
                        tracing::debug!(id = %selected.id, error = %err, "selected task vanished");
                        log.error(format!("Task no longer exists: \"{}\"", selected.text));
                    }
                }
                Self::Idle
            }
            Self::AwaitingDeletionSelection(candidates) => {
                let Some(selected) = select(&candidates, input) else {
                    log.error(INVALID_SELECTION);
                    return Self::Idle;
                };
                log.output(format!(
                    "Are you sure you want to delete \"{}\"? (y/N): ",
                    selected.text
                ));
                Self::AwaitingDeletionConfirmation(selected.clone())
            }
            Self::AwaitingDeletionConfirmation(selected) => {
                if !is_affirmative(input) {
                    log.output("Delete cancelled.");
                    return Self::Idle;
                }
                match delete_task(store.tasks(), &selected.id) {
                    Ok((tasks, _)) => {
                        store.replace_all(tasks);
                        log.success(format!("✓ Deleted: \"{}\"", selected.text));
                    }
                    Err(err) => {
                        tracing::debug!(id = %selected.id, error = %err, "selected task vanished");
                        log.error(format!("Task no longer exists: \"{}\"", selected.text));
                    }
                }
                Self::Idle
            }
        }
    }
}

/// Reads a 1-based index into `candidates`.
fn select<'a>(candidates: &'a [Task], input: &str) -> Option<&'a Task> {
    let index = input.trim().parse::<usize>().ok()?;
    candidates.get(index.checked_sub(1)?)
}

fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::{PendingInteraction, is_affirmative, select};
    use crate::model::{Category, Priority, Task};
    use crate::store::{MemoryStore, TaskStore};
    use crate::terminal::output::{OutputKind, OutputLog};

    fn task(id: &str, text: &str) -> Task {
        Task {
            id: id.to_string(),
            text: text.to_string(),
            description: None,
            completed: false,
            timestamp: "08:00:00".to_string(),
            category: Category::Personal,
            priority: Priority::Medium,
            due_date: None,
        }
    }

    fn last_line(log: &OutputLog) -> (OutputKind, &str) {
        let line = log.lines().last().unwrap();
        (line.kind, line.content.as_str())
    }

    #[test]
    fn select_is_one_based_and_strict() {
        let candidates = vec![task("1", "a"), task("2", "b")];
        assert_eq!(select(&candidates, " 2 ").map(|t| t.id.as_str()), Some("2"));
        assert!(select(&candidates, "0").is_none());
        assert!(select(&candidates, "3").is_none());
        assert!(select(&candidates, "-1").is_none());
        assert!(select(&candidates, "one").is_none());
        assert!(select(&candidates, "").is_none());
    }

    #[test]
    fn affirmation_is_case_insensitive() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" YES "));
        assert!(is_affirmative("Yes"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("yep"));
    }

    #[test]
    fn completion_marks_selected_task_by_id() {
        let mut store = MemoryStore::new(vec![task("9", "new"), task("1", "a"), task("2", "b")]);
        let mut log = OutputLog::new();
        let pending =
            PendingInteraction::AwaitingCompletionSelection(vec![task("1", "a"), task("2", "b")]);

        let next = pending.answer("2", &mut store, &mut log);

        assert!(next.is_idle());
        let completed: Vec<&str> = store
            .tasks()
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(completed, vec!["2"]);
        assert_eq!(last_line(&log), (OutputKind::Success, "✓ Completed: \"b\""));
    }

    #[test]
    fn invalid_completion_selection_returns_to_idle() {
        let mut store = MemoryStore::new(vec![task("1", "a")]);
        let mut log = OutputLog::new();
        let pending = PendingInteraction::AwaitingCompletionSelection(vec![task("1", "a")]);

        let next = pending.answer("2", &mut store, &mut log);

        assert!(next.is_idle());
        assert!(!store.tasks()[0].completed);
        assert_eq!(
            last_line(&log),
            (OutputKind::Error, "Invalid selection. Please try again.")
        );
    }

    #[test]
    fn completion_of_vanished_task_reports_error() {
        let mut store = MemoryStore::default();
        let mut log = OutputLog::new();
        let pending = PendingInteraction::AwaitingCompletionSelection(vec![task("1", "a")]);

        let next = pending.answer("1", &mut store, &mut log);

        assert!(next.is_idle());
        assert_eq!(last_line(&log).0, OutputKind::Error);
    }

    #[test]
    fn deletion_selection_asks_for_confirmation_without_mutation() {
        let mut store = MemoryStore::new(vec![task("1", "a")]);
        let mut log = OutputLog::new();
        let pending = PendingInteraction::AwaitingDeletionSelection(vec![task("1", "a")]);

        let next = pending.answer("1", &mut store, &mut log);

        assert_eq!(next, PendingInteraction::AwaitingDeletionConfirmation(task("1", "a")));
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(
            last_line(&log),
            (OutputKind::Output, "Are you sure you want to delete \"a\"? (y/N): ")
        );
    }

    #[test]
    fn confirmed_deletion_removes_by_id() {
        let mut store = MemoryStore::new(vec![task("2", "b"), task("1", "a")]);
        let mut log = OutputLog::new();
        let pending = PendingInteraction::AwaitingDeletionConfirmation(task("1", "a"));

        let next = pending.answer("YES", &mut store, &mut log);

        assert!(next.is_idle());
        assert_eq!(store.tasks(), &[task("2", "b")]);
        assert_eq!(last_line(&log), (OutputKind::Success, "✓ Deleted: \"a\""));
    }

    #[test]
    fn declined_deletion_keeps_store() {
        let mut store = MemoryStore::new(vec![task("1", "a")]);
        let mut log = OutputLog::new();
        let pending = PendingInteraction::AwaitingDeletionConfirmation(task("1", "a"));

        let next = pending.answer("", &mut store, &mut log);

        assert!(next.is_idle());
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(last_line(&log), (OutputKind::Output, "Delete cancelled."));
    }
}
