// ✅ Task Entity - the planning checklist

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::forms;
use crate::store::{new_id, Record, RecordStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identity (UUID)
    #[serde(default)]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub completed: bool,
}

impl Record for Task {
    const COLLECTION: &'static str = "task";
    const FILE: &'static str = "tasks.json";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Task {
    pub fn new(title: String) -> Self {
        Task {
            id: new_id(),
            title,
            completed: false,
        }
    }
}

/// Checklist completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    /// Whole percent, rounded down; 0 for an empty checklist
    pub percent: u32,
}

impl Progress {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let percent = if total > 0 {
            // integer division floors
            u32::try_from(100 * completed / total).unwrap_or(100)
        } else {
            0
        };

        Progress {
            total,
            completed,
            percent,
        }
    }
}

// ============================================================================
// TASK SERVICE
// ============================================================================

#[derive(Debug, Clone)]
pub struct TaskService {
    store: RecordStore,
}

impl TaskService {
    pub fn new(store: RecordStore) -> Self {
        TaskService { store }
    }

    pub fn list(&self) -> Vec<Task> {
        self.store.load::<Task>().records
    }

    pub fn add(&self, title: &str) -> Result<Task> {
        let task = Task::new(forms::required("title", title)?);

        let mut tasks = self.store.load_for_update::<Task>()?;
        tasks.push(task.clone());
        self.store.save(&tasks)?;

        info!(id = %task.id, "Added task {}", task.title);
        Ok(task)
    }

    /// Flip a task's completion. Returns the new state, or `None` if no such task.
    pub fn toggle(&self, id: &str) -> Result<Option<bool>> {
        let mut tasks = self.store.load_for_update::<Task>()?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        task.completed = !task.completed;
        let completed = task.completed;

        self.store.save(&tasks)?;
        info!(id = %id, completed, "Toggled task");
        Ok(Some(completed))
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut tasks = self.store.load_for_update::<Task>()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        if tasks.len() == before {
            return Ok(false);
        }

        self.store.save(&tasks)?;
        info!(id = %id, "Deleted task");
        Ok(true)
    }

    pub fn progress(&self) -> Progress {
        Progress::from_tasks(&self.list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(completed: bool) -> Task {
        let mut t = Task::new("something".to_string());
        t.completed = completed;
        t
    }

    #[test]
    fn test_progress_floors() {
        let progress = Progress::from_tasks(&[task(true), task(false), task(true)]);

        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 2);
        assert_eq!(progress.percent, 66);
    }

    #[test]
    fn test_progress_empty_and_full() {
        assert_eq!(Progress::from_tasks(&[]).percent, 0);
        assert_eq!(Progress::from_tasks(&[task(true), task(true)]).percent, 100);
    }

    #[test]
    fn test_add_defaults_to_incomplete() {
        let service = TaskService::new(RecordStore::in_memory());
        let added = service.add("Book photographer").unwrap();

        assert!(!added.completed);
        assert_eq!(service.list(), vec![added]);
    }

    #[test]
    fn test_toggle() {
        let service = TaskService::new(RecordStore::in_memory());
        let t = service.add("Send invitations").unwrap();

        assert_eq!(service.toggle(&t.id).unwrap(), Some(true));
        assert_eq!(service.progress().completed, 1);
        assert_eq!(service.toggle(&t.id).unwrap(), Some(false));
        assert_eq!(service.progress().completed, 0);
    }

    #[test]
    fn test_toggle_and_delete_unknown_are_noops() {
        let service = TaskService::new(RecordStore::in_memory());
        service.add("Taste cakes").unwrap();

        assert_eq!(service.toggle("nope").unwrap(), None);
        assert!(!service.delete("nope").unwrap());
        assert_eq!(service.list().len(), 1);
    }

    #[test]
    fn test_legacy_task_json() {
        let t: Task = serde_json::from_str(r#"{"title": "Order rings"}"#).unwrap();
        assert!(!t.completed);
        assert!(t.id.is_empty());
    }
}
