//! Database location configuration.

use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    "libris.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file, or `":memory:"` for an ephemeral
    /// database.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the configured database is the in-memory one.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}
