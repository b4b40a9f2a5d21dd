//! Row-based view model for the task list.
//!
//! `ListView` is what the terminal UI draws: one row per displayed task,
//! each with a stable handle, its text, completion state and filter
//! visibility. The view maps handles to record ids itself, and every row
//! carries its toggle and delete actions ready for dispatch.

use crate::task::Task;

pub const CHECK_ICON: &str = "✔";
pub const UNCHECK_ICON: &str = "○";
pub const DELETE_ICON: &str = "✖";

/// Opaque identifier of a displayed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowHandle(u64);

/// An action bound to a row when it was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Toggle(u64),
    Delete(u64),
}

/// One displayed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    handle: RowHandle,
    task_id: u64,
    text: String,
    done: bool,
    hidden: bool,
}

impl Row {
    pub fn handle(&self) -> RowHandle {
        self.handle
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hidden by the current filter.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Completion toggle for this row.
    pub fn toggle(&self) -> RowAction {
        RowAction::Toggle(self.task_id)
    }

    /// Delete control for this row.
    pub fn delete(&self) -> RowAction {
        RowAction::Delete(self.task_id)
    }

    pub fn check_icon(&self) -> &'static str {
        if self.done {
            CHECK_ICON
        } else {
            UNCHECK_ICON
        }
    }

    /// Text is drawn crossed out once done.
    pub fn strikethrough(&self) -> bool {
        self.done
    }

    fn matches(&self, query_lower: &str) -> bool {
        self.text.to_lowercase().contains(query_lower)
    }
}

/// The displayed list.
#[derive(Debug, Default, Clone)]
pub struct ListView {
    rows: Vec<Row>,
    next_handle: u64,
    filter: String,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row for `task`. Trashed tasks are never displayed and give
    /// `None`. The row is matched against the active filter straight away.
    pub fn append(&mut self, task: &Task) -> Option<RowHandle> {
        if task.trash {
            return None;
        }
        let handle = RowHandle(self.next_handle);
        self.next_handle += 1;
        let mut row = Row {
            handle,
            task_id: task.id,
            text: task.name.clone(),
            done: task.done,
            hidden: false,
        };
        row.hidden = !row.matches(&self.filter);
        self.rows.push(row);
        Some(handle)
    }

    /// Record id a row was rendered for.
    pub fn task_id(&self, handle: RowHandle) -> Option<u64> {
        self.row(handle).map(|r| r.task_id)
    }

    /// Row displaying the record `task_id`.
    pub fn handle_of(&self, task_id: u64) -> Option<RowHandle> {
        self.rows.iter().find(|r| r.task_id == task_id).map(|r| r.handle)
    }

    pub fn row(&self, handle: RowHandle) -> Option<&Row> {
        self.rows.iter().find(|r| r.handle == handle)
    }

    /// Update the checked icon and strikethrough of a row.
    pub fn set_done(&mut self, handle: RowHandle, done: bool) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.handle == handle) {
            row.done = done;
        }
    }

    /// Take a row out of the display.
    pub fn remove(&mut self, handle: RowHandle) -> Option<Row> {
        let idx = self.rows.iter().position(|r| r.handle == handle)?;
        Some(self.rows.remove(idx))
    }

    /// Show rows whose text contains `query` (case-insensitive) and hide
    /// the rest. Rows are never removed here.
    pub fn apply_filter(&mut self, query: &str) {
        self.filter = query.to_lowercase();
        for row in &mut self.rows {
            row.hidden = !row.matches(&self.filter);
        }
    }

    /// Current filter query, lowercased.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// All displayed rows in order, hidden ones included.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows not hidden by the filter.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| !r.hidden)
    }

    /// Drop every row and the filter.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.filter.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, id: u64) -> Task {
        Task::new(name, id)
    }

    #[test]
    fn test_append_skips_trashed() {
        let mut view = ListView::new();
        let mut t = task("gone", 0);
        t.trash = true;
        assert!(view.append(&t).is_none());
        assert!(view.rows().is_empty());
    }

    #[test]
    fn test_handles_map_to_task_ids() {
        let mut view = ListView::new();
        let a = view.append(&task("a", 4)).unwrap();
        let b = view.append(&task("b", 7)).unwrap();
        assert_ne!(a, b);
        assert_eq!(view.task_id(a), Some(4));
        assert_eq!(view.handle_of(7), Some(b));

        let row = view.row(b).unwrap();
        assert_eq!(row.toggle(), RowAction::Toggle(7));
        assert_eq!(row.delete(), RowAction::Delete(7));
    }

    #[test]
    fn test_set_done_updates_icon() {
        let mut view = ListView::new();
        let h = view.append(&task("a", 0)).unwrap();
        assert_eq!(view.row(h).unwrap().check_icon(), UNCHECK_ICON);
        view.set_done(h, true);
        let row = view.row(h).unwrap();
        assert_eq!(row.check_icon(), CHECK_ICON);
        assert!(row.strikethrough());
    }

    #[test]
    fn test_filter_hides_without_removing() {
        let mut view = ListView::new();
        view.append(&task("Buy milk", 0));
        view.append(&task("Walk dog", 1));

        view.apply_filter("MILK");
        let visible: Vec<_> = view.visible_rows().map(|r| r.text()).collect();
        assert_eq!(visible, vec!["Buy milk"]);
        assert_eq!(view.rows().len(), 2);

        view.apply_filter("");
        assert_eq!(view.visible_rows().count(), 2);
    }

    #[test]
    fn test_appended_row_respects_active_filter() {
        let mut view = ListView::new();
        view.apply_filter("milk");
        let h = view.append(&task("Walk dog", 0)).unwrap();
        assert!(view.row(h).unwrap().is_hidden());
    }

    #[test]
    fn test_remove() {
        let mut view = ListView::new();
        let h = view.append(&task("a", 0)).unwrap();
        assert_eq!(view.remove(h).map(|r| r.text().to_string()), Some("a".to_string()));
        assert!(view.remove(h).is_none());
        assert_eq!(view.task_id(h), None);
    }
}
