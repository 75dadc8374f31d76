//! JSON-file task store.
//!
//! Holds the whole task list in memory and rewrites the backing file after
//! every mutation. There is no locking: one process owns the file at a time.

use crate::error::{StoreError, StoreResult};
use crate::types::Task;
use crate::validation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default backing file, relative to the working directory.
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// On-disk layout of the backing file.
#[derive(Debug, Serialize, Deserialize)]
struct TaskFile {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default = "first_id")]
    next_id: u64,
}

fn first_id() -> u64 {
    1
}

/// Borrowed form of `TaskFile`, so saving never clones the collection.
#[derive(Serialize)]
struct TaskFileRef<'a> {
    tasks: &'a [Task],
    next_id: u64,
}

/// Task store backed by a JSON file.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    /// Open the store, loading any prior state from `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let (tasks, next_id) = match load(&path) {
            Some(file) => (file.tasks, file.next_id),
            None => (Vec::new(), first_id()),
        };
        debug!(path = %path.display(), count = tasks.len(), next_id, "Task store opened");
        Self {
            path,
            tasks,
            next_id,
        }
    }

    /// Create a task and persist it.
    pub fn add(&mut self, title: &str, description: &str) -> StoreResult<Task> {
        let title = validation::task_title(title)?;
        let following = self
            .next_id
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted)?;

        let task = Task {
            id: self.next_id,
            title: title.to_string(),
            description: description.trim().to_string(),
            completed: false,
        };

        let previous = self.next_id;
        self.tasks.push(task.clone());
        self.next_id = following;
        if let Err(e) = self.save() {
            self.tasks.pop();
            self.next_id = previous;
            return Err(e);
        }

        debug!(id = task.id, title = %task.title, "Task added");
        Ok(task)
    }

    /// All tasks in insertion order.
    pub fn list(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn get_by_id(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Mark a task completed.
    pub fn complete(&mut self, id: u64) -> StoreResult<Task> {
        self.set_completed(id, true)
    }

    /// Mark a task pending again.
    pub fn incomplete(&mut self, id: u64) -> StoreResult<Task> {
        self.set_completed(id, false)
    }

    fn set_completed(&mut self, id: u64, completed: bool) -> StoreResult<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))?;

        let previous = self.tasks[index].completed;
        self.tasks[index].completed = completed;
        if let Err(e) = self.save() {
            self.tasks[index].completed = previous;
            return Err(e);
        }

        debug!(id, completed, "Task completion updated");
        Ok(self.tasks[index].clone())
    }

    /// The id the next `add` will assign.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the backing file with the full collection and counter.
    fn save(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&TaskFileRef {
            tasks: &self.tasks,
            next_id: self.next_id,
        })?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

fn load(path: &Path) -> Option<TaskFile> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No task file yet, starting empty");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Task file unreadable, starting empty");
            return None;
        }
    };

    let mut file = match serde_json::from_str::<TaskFile>(&content) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Task file malformed, starting empty");
            return None;
        }
    };

    // Never hand out an id that is already taken.
    let mut floor = first_id();
    for task in &file.tasks {
        let Some(after) = task.id.checked_add(1) else {
            warn!(path = %path.display(), id = task.id, "Task id out of range, starting empty");
            return None;
        };
        floor = floor.max(after);
    }
    file.next_id = file.next_id.max(floor);
    Some(file)
}
