use crate::cli::TaskCommand;
use tasklist_core::error::AppError;
use tasklist_core::model::{Category, Task};
use tasklist_core::task_api::{self, NewTask, StatusFilter, TaskStats};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Added(Task),
    Toggled(Task),
    Edited(Task),
    Deleted(Task),
    Listing {
        tasks: Vec<Task>,
        status: StatusFilter,
        category: Option<Category>,
    },
    Stats(TaskStats),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Replacement collection, present only when the command changed it.
    pub updated: Option<Vec<Task>>,
    pub report: Report,
}

impl Outcome {
    fn changed(updated: Vec<Task>, report: Report) -> Self {
        Self {
            updated: Some(updated),
            report,
        }
    }

    fn read_only(report: Report) -> Self {
        Self {
            updated: None,
            report,
        }
    }
}

pub fn execute_task_command(
    command: TaskCommand,
    tasks: &[Task],
    now: OffsetDateTime,
) -> Result<Outcome, AppError> {
    let outcome = match command {
        TaskCommand::Add {
            text,
            description,
            category,
            priority,
            due,
        } => {
            let text = text.ok_or_else(|| AppError::invalid_input("text is required"))?;
            let mut new_task = NewTask::new(text);
            new_task.description = description;
            new_task.due_date = due;
            if let Some(category) = category {
                new_task.category = category;
            }
            if let Some(priority) = priority {
                new_task.priority = priority;
            }
            let (updated, task) = task_api::add_task(tasks, new_task, now)?;
            Outcome::changed(updated, Report::Added(task))
        }
        TaskCommand::Toggle { id } => {
            let (updated, task) = task_api::toggle_task(tasks, &id)?;
            Outcome::changed(updated, Report::Toggled(task))
        }
        TaskCommand::Edit {
            id,
            text,
            description,
        } => {
            let (updated, task) = task_api::edit_task(tasks, &id, &text, description.as_deref())?;
            Outcome::changed(updated, Report::Edited(task))
        }
        TaskCommand::Delete { id } => {
            let (updated, task) = task_api::delete_task(tasks, &id)?;
            Outcome::changed(updated, Report::Deleted(task))
        }
        TaskCommand::List { status, category } => Outcome::read_only(Report::Listing {
            tasks: task_api::filter_tasks(tasks, status, category),
            status,
            category,
        }),
        TaskCommand::Stats => Outcome::read_only(Report::Stats(task_api::stats(tasks))),
    };

    tracing::debug!(changed = outcome.updated.is_some(), "executed task command");
    Ok(outcome)
}
