use crate::model::Task;

/// The task collection as seen by the front-ends.
///
/// Readers take the whole collection; writers hand back a whole replacement.
/// There is no finer-grained update path.
pub trait TaskStore {
    fn tasks(&self) -> &[Task];

    fn replace_all(&mut self, tasks: Vec<Task>);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    tasks: Vec<Task>,
}

impl MemoryStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

impl TaskStore for MemoryStore {
    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }
}
