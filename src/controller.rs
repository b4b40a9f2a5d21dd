//! Application controller.
//!
//! The `Controller` owns the whole application state: the task store, the
//! key-value persistence it mirrors into, the displayed list and the
//! derived counters. Every user action goes through it in one direction:
//! mutate the store, persist it, then update the view and counters. A
//! failed save rolls the store back, so the view, the counters and the
//! persisted blob never disagree.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::counter::Counters;
use crate::error::{Result, TodoError};
use crate::input::InputField;
use crate::kv::KvStore;
use crate::store::TaskStore;
use crate::view::{ListView, RowAction};

/// Format a date the long way, e.g. `Monday, Oct 19`.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %b %-d").to_string()
}

/// Single owner of the task list state.
pub struct Controller<K: KvStore> {
    kv: K,
    store: TaskStore,
    view: ListView,
    counters: Counters,
    /// Entry field for new tasks.
    pub entry: InputField,
    /// Live filter field.
    pub search: InputField,
    notice: Option<String>,
    date_label: String,
}

impl<K: KvStore> Controller<K> {
    /// Load the persisted tasks from `kv` and build the initial display.
    pub fn load(kv: K) -> Result<Self> {
        let store = TaskStore::load(&kv)?;
        let mut controller = Controller {
            kv,
            store,
            view: ListView::new(),
            counters: Counters::default(),
            entry: InputField::new(),
            search: InputField::new(),
            notice: None,
            date_label: long_date(Local::now().date_naive()),
        };
        controller.render_all();
        Ok(controller)
    }

    /// Render every non-trashed record, counting each as it is shown.
    fn render_all(&mut self) {
        for task in self.store.tasks() {
            if self.view.append(task).is_some() {
                self.counters.add(task.done);
            }
        }
        debug!(
            rows = self.view.rows().len(),
            undone = self.counters.undone(),
            "rendered task list"
        );
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save(&mut self.kv)
    }

    /// Create a task from `text`.
    ///
    /// Empty or whitespace-only text raises the blocking notice, selects the
    /// entry field contents and leaves every piece of state untouched. So
    /// does a failed save, except that the entry text is kept for a retry.
    pub fn create_task(&mut self, text: &str) -> Result<u64> {
        if text.trim().is_empty() {
            self.notice = Some(TodoError::EmptyTask.to_string());
            self.entry.select_all();
            debug!("rejected empty task");
            return Err(TodoError::EmptyTask);
        }

        let task = self.store.push(text).clone();
        if let Err(e) = self.persist() {
            self.store.pop();
            warn!(error = %e, "could not save new task, rolled back");
            return Err(e);
        }
        self.view.append(&task);
        self.counters.add(task.done);
        self.entry.clear();
        debug!(id = task.id, name = %task.name, "created task");
        Ok(task.id)
    }

    /// Create a task from the entry field contents.
    pub fn submit_entry(&mut self) -> Result<u64> {
        let text = self.entry.value.clone();
        self.create_task(&text)
    }

    /// Flip the completion flag of a task; returns the new value.
    pub fn toggle_done(&mut self, task_id: u64) -> Result<bool> {
        let task = self
            .store
            .get_mut(task_id)
            .ok_or(TodoError::UnknownTask(task_id))?;
        if task.trash {
            return Err(TodoError::Trashed(task_id));
        }
        task.done = !task.done;
        let done = task.done;
        if let Err(e) = self.persist() {
            if let Some(task) = self.store.get_mut(task_id) {
                task.done = !done;
            }
            warn!(id = task_id, error = %e, "could not save toggle, rolled back");
            return Err(e);
        }

        if let Some(handle) = self.view.handle_of(task_id) {
            self.view.set_done(handle, done);
        }
        self.counters.toggled(done);
        debug!(id = task_id, done, undone = self.counters.undone(), "toggled task");
        Ok(done)
    }

    /// Move a task to the trash. Returns `false` when it already was.
    pub fn delete_task(&mut self, task_id: u64) -> Result<bool> {
        let task = self
            .store
            .get_mut(task_id)
            .ok_or(TodoError::UnknownTask(task_id))?;
        if task.trash {
            return Ok(false);
        }
        task.trash = true;
        let was_done = task.done;
        if let Err(e) = self.persist() {
            if let Some(task) = self.store.get_mut(task_id) {
                task.trash = false;
            }
            warn!(id = task_id, error = %e, "could not save delete, rolled back");
            return Err(e);
        }

        if let Some(handle) = self.view.handle_of(task_id) {
            self.view.remove(handle);
        }
        self.counters.removed(was_done);
        debug!(id = task_id, was_done, valid = self.counters.valid_tasks(), "deleted task");
        Ok(true)
    }

    /// Run an action bound to a displayed row.
    pub fn dispatch(&mut self, action: RowAction) -> Result<()> {
        match action {
            RowAction::Toggle(id) => self.toggle_done(id).map(|_| ()),
            RowAction::Delete(id) => self.delete_task(id).map(|_| ()),
        }
    }

    /// Hide displayed rows that do not contain `query`.
    pub fn apply_filter(&mut self, query: &str) {
        self.view.apply_filter(query);
    }

    /// Re-run the filter with the search field contents.
    pub fn refilter(&mut self) {
        let query = self.search.value.clone();
        self.apply_filter(&query);
    }

    /// Erase all persisted state and rebuild everything from scratch.
    pub fn clear_all(&mut self) -> Result<()> {
        TaskStore::clear(&mut self.kv)?;
        self.store = TaskStore::load(&self.kv)?;
        self.view.reset();
        self.counters = Counters::default();
        self.entry.clear();
        self.search.clear();
        self.notice = None;
        self.date_label = long_date(Local::now().date_naive());
        self.render_all();
        info!("reloaded after clear");
        Ok(())
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Pending blocking notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Date shown in the header; fixed for the session.
    pub fn date_label(&self) -> &str {
        &self.date_label
    }
}
