//! Derived counters: tasks left to do and the empty-list indicator.

/// Running totals kept in step with store mutations.
///
/// Both counts are adjusted incrementally by the controller rather than
/// recomputed from the store.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    valid_tasks: usize,
    undone: usize,
}

impl Counters {
    /// Count a newly displayed task.
    pub fn add(&mut self, done: bool) {
        self.valid_tasks += 1;
        if !done {
            self.undone += 1;
        }
    }

    /// Adjust for a completion flip; `done` is the new value.
    pub fn toggled(&mut self, done: bool) {
        if done {
            self.undone = self.undone.saturating_sub(1);
        } else {
            self.undone += 1;
        }
    }

    /// Uncount a deleted task. Only a task that was not done was counted
    /// in `undone`.
    pub fn removed(&mut self, was_done: bool) {
        self.valid_tasks = self.valid_tasks.saturating_sub(1);
        if !was_done {
            self.undone = self.undone.saturating_sub(1);
        }
    }

    pub fn valid_tasks(&self) -> usize {
        self.valid_tasks
    }

    pub fn undone(&self) -> usize {
        self.undone
    }

    /// Counter display text.
    pub fn todo_label(&self) -> String {
        format!("{} to do", self.undone)
    }

    /// Whether the "empty list" message should be visible.
    pub fn show_empty_message(&self) -> bool {
        self.valid_tasks == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_toggle() {
        let mut c = Counters::default();
        assert!(c.show_empty_message());
        c.add(false);
        c.add(true);
        assert_eq!(c.valid_tasks(), 2);
        assert_eq!(c.undone(), 1);
        assert_eq!(c.todo_label(), "1 to do");
        assert!(!c.show_empty_message());

        c.toggled(true);
        assert_eq!(c.todo_label(), "0 to do");
        c.toggled(false);
        assert_eq!(c.undone(), 1);
    }

    #[test]
    fn test_removed_polarity() {
        let mut c = Counters::default();
        c.add(false);
        c.add(true);
        c.removed(true);
        assert_eq!(c.undone(), 1);
        c.removed(false);
        assert_eq!(c.undone(), 0);
        assert!(c.show_empty_message());
    }

    #[test]
    fn test_never_negative() {
        let mut c = Counters::default();
        c.removed(false);
        assert_eq!(c.valid_tasks(), 0);
        assert_eq!(c.undone(), 0);
        assert!(c.show_empty_message());
    }
}
