//! Error type shared by the store, controller and command layers.

use std::io;

/// Everything that can go wrong while handling a task list operation.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    /// The entry text was empty or only whitespace.
    #[error("Please fill out todo input")]
    EmptyTask,

    /// No record carries this id.
    #[error("task {0} not found")]
    UnknownTask(u64),

    /// The record was deleted and can no longer change.
    #[error("task {0} has been deleted")]
    Trashed(u64),

    /// Reading or writing the key-value file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A value could not be encoded as JSON.
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// No home directory to put the default store in.
    #[error("could not determine home directory (pass --store explicitly)")]
    NoDataDir,
}

pub type Result<T, E = TodoError> = std::result::Result<T, E>;
