//! Task record definition.
//!
//! The field names and their order are the persisted layout: every stored
//! blob is a JSON array of `{"name", "id", "done", "trash"}` objects.

use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// Deleting a task only sets `trash`; the record stays in the stored
/// sequence as a tombstone so ids are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub id: u64,
    pub done: bool,
    pub trash: bool,
}

impl Task {
    /// Create a fresh, active, not-done task.
    pub fn new(name: impl Into<String>, id: u64) -> Self {
        Task {
            name: name.into(),
            id,
            done: false,
            trash: false,
        }
    }

    /// Whether the task is still shown and counted.
    pub fn is_active(&self) -> bool {
        !self.trash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let task = Task::new("Buy milk", 0);
        let json = serde_json::to_string(&task).unwrap();
        assert_eq!(json, r#"{"name":"Buy milk","id":0,"done":false,"trash":false}"#);
    }

    #[test]
    fn test_flags() {
        let mut task = Task::new("Walk dog", 3);
        assert!(task.is_active());
        task.done = true;
        assert!(task.is_active());
        task.trash = true;
        assert!(!task.is_active());
    }
}
