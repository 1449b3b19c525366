use crate::error::AppError;
use crate::model::{Category, Priority, Task};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(AppError::invalid_input(format!(
                "status must be all, active or completed, got '{}'",
                raw.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub description: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<String>,
}

impl NewTask {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            description: None,
            category: Category::Personal,
            priority: Priority::Medium,
            due_date: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub categories: usize,
}

pub fn local_now() -> OffsetDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset)
}

/// 24-hour wall clock time, as shown next to tasks and output lines.
pub fn display_time(now: OffsetDateTime) -> String {
    let format = format_description!("[hour]:[minute]:[second]");
    now.format(&format)
        .unwrap_or_else(|_| String::from("00:00:00"))
}

/// Millisecond clock reading, bumped until it names no existing task.
pub fn next_task_id(tasks: &[Task], now: OffsetDateTime) -> String {
    let mut candidate = now.unix_timestamp_nanos() / 1_000_000;
    loop {
        let id = candidate.to_string();
        if !tasks.iter().any(|task| task.id == id) {
            return id;
        }
        candidate += 1;
    }
}

pub fn parse_due_date(raw: &str) -> Result<String, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    let trimmed = raw.trim();
    let date = Date::parse(trimmed, &format).map_err(|_| {
        AppError::invalid_input(format!("due date must be YYYY-MM-DD, got '{trimmed}'"))
    })?;
    date.format(&format)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn add_task(
    tasks: &[Task],
    new_task: NewTask,
    now: OffsetDateTime,
) -> Result<(Vec<Task>, Task), AppError> {
    let text = new_task.text.trim();
    if text.is_empty() {
        return Err(AppError::invalid_input("text is required"));
    }

    let due_date = match non_blank(new_task.due_date.as_deref()) {
        Some(raw) => Some(parse_due_date(&raw)?),
        None => None,
    };

    let task = Task {
        id: next_task_id(tasks, now),
        text: text.to_string(),
        description: non_blank(new_task.description.as_deref()),
        completed: false,
        timestamp: display_time(now),
        category: new_task.category,
        priority: new_task.priority,
        due_date,
    };

    Ok((prepend(tasks, task.clone()), task))
}

/// Puts `task` at the head of a copy of `tasks`.
pub fn prepend(tasks: &[Task], task: Task) -> Vec<Task> {
    let mut updated = Vec::with_capacity(tasks.len() + 1);
    updated.push(task);
    updated.extend_from_slice(tasks);
    updated
}

fn update_task<F>(tasks: &[Task], id: &str, apply: F) -> Result<(Vec<Task>, Task), AppError>
where
    F: FnOnce(&mut Task),
{
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let mut updated = tasks.to_vec();
    let task = updated
        .iter_mut()
        .find(|task| task.id == trimmed_id)
        .ok_or_else(|| AppError::invalid_input("task not found"))?;
    apply(task);
    let changed = task.clone();

    Ok((updated, changed))
}

pub fn toggle_task(tasks: &[Task], id: &str) -> Result<(Vec<Task>, Task), AppError> {
    update_task(tasks, id, |task| task.completed = !task.completed)
}

pub fn complete_task(tasks: &[Task], id: &str) -> Result<(Vec<Task>, Task), AppError> {
    update_task(tasks, id, |task| task.completed = true)
}

pub fn edit_task(
    tasks: &[Task],
    id: &str,
    text: &str,
    description: Option<&str>,
) -> Result<(Vec<Task>, Task), AppError> {
    let trimmed_text = text.trim();
    if trimmed_text.is_empty() {
        return Err(AppError::invalid_input("text is required"));
    }

    let description = non_blank(description);
    update_task(tasks, id, |task| {
        task.text = trimmed_text.to_string();
        task.description = description;
    })
}

pub fn delete_task(tasks: &[Task], id: &str) -> Result<(Vec<Task>, Task), AppError> {
    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let mut updated = tasks.to_vec();
    let index = updated
        .iter()
        .position(|task| task.id == trimmed_id)
        .ok_or_else(|| AppError::invalid_input("task not found"))?;
    let removed = updated.remove(index);

    Ok((updated, removed))
}

pub fn filter_tasks(tasks: &[Task], status: StatusFilter, category: Option<Category>) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| status.matches(task))
        .filter(|task| category.is_none_or(|category| task.category == category))
        .cloned()
        .collect()
}

pub fn stats(tasks: &[Task]) -> TaskStats {
    let completed = tasks.iter().filter(|task| task.completed).count();
    let categories: BTreeSet<Category> = tasks.iter().map(|task| task.category).collect();

    TaskStats {
        total: tasks.len(),
        active: tasks.len() - completed,
        completed,
        categories: categories.len(),
    }
}

/// Hint shown under "No tasks found" when a filtered listing is empty.
pub fn empty_listing_message(status: StatusFilter, category: Option<Category>) -> String {
    if status == StatusFilter::All && category.is_none() {
        return "Add your first task to get started".to_string();
    }

    let mut words = vec!["No"];
    if status != StatusFilter::All {
        words.push(status.as_str());
    }
    if let Some(category) = category {
        words.push(category.as_str());
    }
    words.push("tasks");
    words.join(" ")
}
