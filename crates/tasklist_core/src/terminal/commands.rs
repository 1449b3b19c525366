use super::output::OutputLog;
use super::parser::ParsedCommand;
use super::pending::PendingInteraction;
use crate::model::{Category, Priority, Task};
use crate::store::TaskStore;
use crate::task_api::{display_time, next_task_id, prepend};
use time::OffsetDateTime;

pub(super) const CREATE_USAGE: &str =
    "Usage: create \"My task here\" --project Work --priority High";
pub(super) const MODE_USAGE: &str = "Usage: mode gui";
const DEFAULT_PROJECT: &str = "None";

const HELP_LINES: &[&str] = &[
    "",
    "┌─ Terminal Todo Manager - Available Commands ─┐",
    "",
    "📋 Task Management:",
    "  create \"Task description\" [options]",
    "    Creates a new task with optional metadata",
    "    --project   Project name: Personal, Work, Shopping, Health (default: \"None\")",
    "    --priority  Priority level: Low, Medium, High (default: Medium)",
    "    Example: create \"Buy groceries\" --project Personal --priority High",
    "",
    "  complete",
    "    Mark a task as completed via interactive selection",
    "",
    "  drop",
    "    Delete a task with confirmation prompt",
    "",
    "⚙️  System:",
    "  help",
    "    Display this help message",
    "",
    "  clear",
    "    Clear the screen",
    "",
    "  mode gui",
    "    Switch to graphical interface",
    "",
    "└────────────────────────────────────────────────┘",
    "",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CommandName {
    Create,
    Complete,
    Drop,
    Help,
    Mode,
    Clear,
}

impl CommandName {
    pub(super) fn resolve(name: &str) -> Option<Self> {
        match name {
            "create" => Some(Self::Create),
            "complete" => Some(Self::Complete),
            "drop" => Some(Self::Drop),
            "help" => Some(Self::Help),
            "mode" => Some(Self::Mode),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }
}

pub(super) fn execute_create(
    command: &ParsedCommand,
    store: &mut dyn TaskStore,
    log: &mut OutputLog,
    now: OffsetDateTime,
) {
    if command.args.is_empty() {
        log.error("Error: Task description is required");
        log.output(CREATE_USAGE);
        return;
    }

    let priority = match command.flag("priority") {
        None => Priority::Medium,
        Some(raw) => match raw.to_lowercase().parse::<Priority>() {
            Ok(priority) => priority,
            Err(_) => {
                log.error(format!(
                    "Error: Invalid priority \"{raw}\". Expected Low, Medium or High"
                ));
                log.output(CREATE_USAGE);
                return;
            }
        },
    };

    let text = command.args.join(" ");
    let project = command.flag("project").unwrap_or(DEFAULT_PROJECT);
    let task = Task {
        id: next_task_id(store.tasks(), now),
        text,
        description: None,
        completed: false,
        timestamp: display_time(now),
        category: Category::from_project(project),
        priority,
        due_date: None,
    };

    log.success(format!(
        "✓ Task created: \"{}\" [Project: {}, Priority: {}]",
        task.text,
        project,
        task.priority.upper()
    ));
    tracing::debug!(id = %task.id, category = %task.category, "created task");
    let updated = prepend(store.tasks(), task);
    store.replace_all(updated);
}

pub(super) fn execute_complete(tasks: &[Task], log: &mut OutputLog) -> PendingInteraction {
    let candidates: Vec<Task> = tasks.iter().filter(|task| !task.completed).cloned().collect();
    if candidates.is_empty() {
        log.output("No active tasks to complete");
        return PendingInteraction::Idle;
    }

    log.output("Active tasks:");
    for (index, task) in candidates.iter().enumerate() {
        log.output(format!(
            "  [{}] {} ({}, {})",
            index + 1,
            task.text,
            task.priority.upper(),
            task.category
        ));
    }
    log.output("");
    log.output(format!(
        "Select task to complete [1-{}]: ",
        candidates.len()
    ));

    PendingInteraction::AwaitingCompletionSelection(candidates)
}

pub(super) fn execute_drop(tasks: &[Task], log: &mut OutputLog) -> PendingInteraction {
    if tasks.is_empty() {
        log.output("No tasks to delete");
        return PendingInteraction::Idle;
    }

    log.output("All tasks:");
    for (index, task) in tasks.iter().enumerate() {
        let status = if task.completed { "[DONE]" } else { "[ACTIVE]" };
        log.output(format!(
            "  [{}] {} {} ({}, {})",
            index + 1,
            task.text,
            status,
            task.priority.upper(),
            task.category
        ));
    }
    log.output("");
    log.output(format!("Select task to delete [1-{}]: ", tasks.len()));

    PendingInteraction::AwaitingDeletionSelection(tasks.to_vec())
}

pub(super) fn execute_help(log: &mut OutputLog) {
    for line in HELP_LINES {
        log.output(*line);
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandName, HELP_LINES, execute_complete, execute_create, execute_drop};
    use crate::model::{Category, Priority, Task};
    use crate::store::{MemoryStore, TaskStore};
    use crate::terminal::output::{OutputKind, OutputLog};
    use crate::terminal::parser::parse_command;
    use crate::terminal::pending::PendingInteraction;
    use time::macros::datetime;

    fn task(id: &str, text: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            text: text.to_string(),
            description: None,
            completed,
            timestamp: "08:00:00".to_string(),
            category: Category::Work,
            priority: Priority::Low,
            due_date: None,
        }
    }

    #[test]
    fn resolve_knows_every_command() {
        assert_eq!(CommandName::resolve("create"), Some(CommandName::Create));
        assert_eq!(CommandName::resolve("clear"), Some(CommandName::Clear));
        assert_eq!(CommandName::resolve("Create"), None);
        assert_eq!(CommandName::resolve(""), None);
    }

    #[test]
    fn create_maps_project_and_priority() {
        let mut store = MemoryStore::default();
        let mut log = OutputLog::new();
        let now = datetime!(2026-05-05 10:00:00 UTC);

        execute_create(
            &parse_command("create Ship release --project Work --priority HIGH"),
            &mut store,
            &mut log,
            now,
        );

        let created = &store.tasks()[0];
        assert_eq!(created.text, "Ship release");
        assert_eq!(created.category, Category::Work);
        assert_eq!(created.priority, Priority::High);
        assert_eq!(created.timestamp, "10:00:00");
        let last = log.lines().last().unwrap();
        assert_eq!(last.kind, OutputKind::Success);
        assert_eq!(
            last.content,
            "✓ Task created: \"Ship release\" [Project: Work, Priority: HIGH]"
        );
    }

    #[test]
    fn create_defaults_to_none_project_and_medium() {
        let mut store = MemoryStore::default();
        let mut log = OutputLog::new();
        let now = datetime!(2026-05-05 10:00:00 UTC);

        execute_create(&parse_command("create stretch"), &mut store, &mut log, now);
        execute_create(
            &parse_command("create water plants --project Garden"),
            &mut store,
            &mut log,
            now,
        );

        assert_eq!(store.tasks()[0].text, "water plants");
        assert_eq!(store.tasks()[0].category, Category::Other);
        assert_eq!(store.tasks()[1].category, Category::Other);
        assert_eq!(store.tasks()[1].priority, Priority::Medium);
        assert_ne!(store.tasks()[0].id, store.tasks()[1].id);
        assert!(log.lines()[1].content.contains("[Project: None, Priority: MEDIUM]"));
    }

    #[test]
    fn create_rejects_unknown_priority_without_mutation() {
        let mut store = MemoryStore::default();
        let mut log = OutputLog::new();
        let now = datetime!(2026-05-05 10:00:00 UTC);

        execute_create(
            &parse_command("create nap --priority urgent"),
            &mut store,
            &mut log,
            now,
        );

        assert!(store.tasks().is_empty());
        let errors: Vec<_> = log
            .lines()
            .iter()
            .filter(|line| line.kind == OutputKind::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].content.contains("\"urgent\""));
    }

    #[test]
    fn complete_lists_only_active_tasks() {
        let tasks = vec![task("2", "b", true), task("1", "a", false)];
        let mut log = OutputLog::new();

        let pending = execute_complete(&tasks, &mut log);

        assert_eq!(
            pending,
            PendingInteraction::AwaitingCompletionSelection(vec![task("1", "a", false)])
        );
        let contents: Vec<&str> = log.lines()[1..].iter().map(|l| l.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                "Active tasks:",
                "  [1] a (LOW, work)",
                "",
                "Select task to complete [1-1]: ",
            ]
        );
    }

    #[test]
    fn complete_with_nothing_active_stays_idle() {
        let mut log = OutputLog::new();
        let pending = execute_complete(&[task("1", "a", true)], &mut log);
        assert!(pending.is_idle());
        assert_eq!(log.lines()[1].content, "No active tasks to complete");
    }

    #[test]
    fn drop_lists_all_tasks_with_status() {
        let tasks = vec![task("2", "b", true), task("1", "a", false)];
        let mut log = OutputLog::new();

        let pending = execute_drop(&tasks, &mut log);

        assert_eq!(pending, PendingInteraction::AwaitingDeletionSelection(tasks));
        assert_eq!(log.lines()[2].content, "  [1] b [DONE] (LOW, work)");
        assert_eq!(log.lines()[3].content, "  [2] a [ACTIVE] (LOW, work)");
        assert_eq!(log.lines()[5].content, "Select task to delete [1-2]: ");
    }

    #[test]
    fn drop_with_empty_store_stays_idle() {
        let mut log = OutputLog::new();
        assert!(execute_drop(&[], &mut log).is_idle());
        assert_eq!(log.lines()[1].content, "No tasks to delete");
    }

    #[test]
    fn help_block_mentions_every_command() {
        let text = HELP_LINES.join("\n");
        for name in ["create", "complete", "drop", "help", "clear", "mode gui"] {
            assert!(text.contains(name), "help is missing {name}");
        }
    }
}
