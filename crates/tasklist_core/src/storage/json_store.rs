use crate::error::AppError;
use crate::model::Task;
use crate::store::TaskStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
pub const STORE_ENV_VAR: &str = "TASKLIST_STORE_PATH";
const STORE_FILE_NAME: &str = "tasks.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    tasks: Vec<Task>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("tasklist").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklist")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    // A bare array is the unversioned layout.
    let tasks = if content.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Task>>(&content)?
    } else {
        let stored = serde_json::from_str::<StoredTasks>(&content)?;
        if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
            return Err(AppError::invalid_data("schema_version mismatch"));
        }
        stored.tasks
    };

    let mut seen = HashSet::with_capacity(tasks.len());
    if let Some(duplicate) = tasks.iter().find(|task| !seen.insert(task.id.as_str())) {
        return Err(AppError::invalid_data(format!(
            "duplicate task id '{}'",
            duplicate.id
        )));
    }

    Ok(tasks)
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let stored = StoredTasks {
        schema_version: SCHEMA_VERSION,
        tasks: tasks.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)?;
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    Ok(())
}

/// A [`TaskStore`] backed by a JSON file.
///
/// Both directions are best-effort: a file that cannot be read opens as an
/// empty collection and a failed save keeps the in-memory collection.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl JsonFileStore {
    pub fn open(path: PathBuf) -> Self {
        let tasks = match load_tasks(&path) {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to load tasks");
                Vec::new()
            }
        };
        tracing::debug!(path = %path.display(), count = tasks.len(), "opened task store");
        Self { path, tasks }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the collection and reports failure to the caller.
    pub fn flush(&self) -> Result<(), AppError> {
        save_tasks(&self.path, &self.tasks)
    }
}

impl TaskStore for JsonFileStore {
    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        if let Err(err) = self.flush() {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to save tasks");
        }
    }
}
