use crate::actions::Report;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasklist_core::config::Palette;
use tasklist_core::model::{Category, Task};
use tasklist_core::task_api::{StatusFilter, TaskStats, empty_listing_message};
use tasklist_core::terminal::OutputLine;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "")]
    check: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TASK")]
    text: String,
    #[tabled(rename = "PRIORITY")]
    priority: &'static str,
    #[tabled(rename = "CATEGORY")]
    category: &'static str,
    #[tabled(rename = "DUE")]
    due: String,
    #[tabled(rename = "ADDED")]
    added: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        let text = match task.description.as_deref() {
            Some(description) => format!("{}\n  {}", task.text, description),
            None => task.text.clone(),
        };
        Self {
            check: if task.completed { "[x]" } else { "[ ]" },
            id: task.id.clone(),
            text,
            priority: task.priority.upper(),
            category: task.category.label(),
            due: task.due_date.clone().unwrap_or_else(|| "-".to_string()),
            added: task.timestamp.clone(),
        }
    }
}

pub fn output_line(line: &OutputLine, palette: &Palette) -> String {
    palette.paint(line.kind, &line.content)
}

pub fn task_cards(tasks: &[Task], status: StatusFilter, category: Option<Category>) -> String {
    if tasks.is_empty() {
        return format!(
            "> No tasks found\n  {}",
            empty_listing_message(status, category)
        );
    }

    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_line(stats: &TaskStats) -> String {
    format!(
        "Total: {} | Active: {} | Completed: {} | Categories: {}",
        stats.total, stats.active, stats.completed, stats.categories
    )
}

pub fn report_plain(report: &Report) -> String {
    match report {
        Report::Added(task) => format!("Added task: {} ({})", task.text, task.id),
        Report::Toggled(task) => {
            let state = if task.completed { "completed" } else { "active" };
            format!("Marked {}: {} ({})", state, task.text, task.id)
        }
        Report::Edited(task) => format!("Updated task: {} ({})", task.text, task.id),
        Report::Deleted(task) => format!("Deleted task: {} ({})", task.text, task.id),
        Report::Listing {
            tasks,
            status,
            category,
        } => task_cards(tasks, *status, *category),
        Report::Stats(stats) => stats_line(stats),
    }
}

pub fn report_json(report: &Report) -> serde_json::Value {
    let task_json = |task: &Task| serde_json::to_value(task).unwrap_or(serde_json::Value::Null);
    match report {
        Report::Added(task)
        | Report::Toggled(task)
        | Report::Edited(task)
        | Report::Deleted(task) => task_json(task),
        Report::Listing { tasks, .. } => {
            serde_json::Value::Array(tasks.iter().map(task_json).collect())
        }
        Report::Stats(stats) => serde_json::json!({
            "total": stats.total,
            "active": stats.active,
            "completed": stats.completed,
            "categories": stats.categories,
        }),
    }
}
