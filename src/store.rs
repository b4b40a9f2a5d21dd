//! The ordered task sequence and its persistence slot.
//!
//! The whole sequence, tombstones included, is serialized as a JSON array
//! and written under [`STORE_KEY`] after every mutation.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::kv::KvStore;
use crate::task::Task;

/// Key of the persistence slot holding the task blob.
pub const STORE_KEY: &str = "TODO";

/// In-memory task sequence plus the id counter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    /// Build a store from an already decoded sequence.
    ///
    /// The next id is past both the sequence length and the highest stored
    /// id, so a hand-edited or foreign blob cannot make a new task collide
    /// with an existing one.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks
            .iter()
            .map(|t| t.id.saturating_add(1))
            .max()
            .unwrap_or(0)
            .max(tasks.len() as u64);
        TaskStore { tasks, next_id }
    }

    /// Load the sequence from the persistence slot.
    ///
    /// A missing slot gives an empty store. A blob that does not decode is
    /// also treated as an empty store; it stays in the slot until the next
    /// save overwrites it.
    pub fn load<K: KvStore + ?Sized>(kv: &K) -> Result<Self> {
        let Some(blob) = kv.get(STORE_KEY)? else {
            info!("no stored tasks, starting empty");
            return Ok(TaskStore::default());
        };
        match serde_json::from_str::<Vec<Task>>(&blob) {
            Ok(tasks) => {
                info!(count = tasks.len(), "loaded tasks");
                Ok(TaskStore::from_tasks(tasks))
            }
            Err(e) => {
                warn!(error = %e, "stored tasks are malformed, starting empty");
                Ok(TaskStore::default())
            }
        }
    }

    /// Serialize the full sequence into the persistence slot.
    pub fn save<K: KvStore + ?Sized>(&self, kv: &mut K) -> Result<()> {
        let blob = serde_json::to_string(&self.tasks)?;
        kv.set(STORE_KEY, &blob)?;
        debug!(count = self.tasks.len(), bytes = blob.len(), "saved tasks");
        Ok(())
    }

    /// Erase all persisted state.
    pub fn clear<K: KvStore + ?Sized>(kv: &mut K) -> Result<()> {
        kv.clear()?;
        info!("cleared persisted state");
        Ok(())
    }

    /// Append a new active task and return it.
    pub fn push(&mut self, name: &str) -> &Task {
        let id = self.next_id;
        self.tasks.push(Task::new(name, id));
        self.next_id += 1;
        &self.tasks[self.tasks.len() - 1]
    }

    /// Undo the latest [`push`](Self::push), handing its id back.
    pub fn pop(&mut self) -> Option<Task> {
        let task = self.tasks.pop()?;
        self.next_id = task.id;
        Some(task)
    }

    /// Id the next created task will get.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Get a task by id.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by id.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Every record, tombstones included, in creation order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Records that are not trashed.
    pub fn active(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_active())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
