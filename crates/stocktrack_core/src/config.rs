//! Process configuration resolved from environment variables.
//!
//! # Responsibility
//! - Decide where the inventory database and log files live.
//! - Validate values once so callers never re-check them.
//!
//! # Invariants
//! - `log_level` is always one of `trace|debug|info|warn|error`.
//! - `log_dir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "STOCKTRACK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "STOCKTRACK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STOCKTRACK_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "stocktrack.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `STOCKTRACK_*` variables from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`; blank values count as unset.
    ///
    /// # Errors
    /// - Returns an error for an unsupported log level.
    /// - Returns an error for a relative log directory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level)?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(normalize_log_dir(&dir)?);
        }

        Ok(config)
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }
}
