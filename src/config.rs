//! Runtime configuration resolved from CLI flags, environment and defaults.
//!
//! Priority (highest first):
//! 1. `--store` / `--log-level` flags
//! 2. `TODO_STORE` / `TODO_LOG` environment variables (via clap `env`)
//! 3. `~/.todo/store.json` and `warn`

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{Result, TodoError};

/// Directory under the home directory holding the default store.
pub const DATA_DIR_NAME: &str = ".todo";
/// File name of the default store.
pub const STORE_FILE_NAME: &str = "store.json";
/// File name of the TUI log, placed next to the store.
pub const LOG_FILE_NAME: &str = "todo.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Resolve the configuration for a parsed command line.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let store_path = match &cli.store {
            Some(path) => path.clone(),
            None => default_store_path(dirs::home_dir().as_deref())?,
        };
        Ok(Config {
            store_path,
            log_level: cli.log_level.clone(),
        })
    }

    /// Directory holding the store file.
    pub fn data_dir(&self) -> &Path {
        self.store_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Where the TUI writes its log.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join(LOG_FILE_NAME)
    }

    /// Create the data directory if needed.
    pub fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(self.data_dir())?;
        Ok(())
    }
}

/// Default store location under `home`.
pub fn default_store_path(home: Option<&Path>) -> Result<PathBuf> {
    let home = home.ok_or(TodoError::NoDataDir)?;
    Ok(home.join(DATA_DIR_NAME).join(STORE_FILE_NAME))
}
