//! Event ledger configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Directory for the day-partitioned JSONL ledger files. Empty disables
    /// the ledger.
    #[serde(default)]
    pub dir: String,
}

impl LedgerConfig {
    /// Whether a ledger directory has been configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.dir.is_empty()
    }

    /// The configured directory as a path, when enabled.
    #[must_use]
    pub fn dir_path(&self) -> Option<PathBuf> {
        self.is_enabled().then(|| PathBuf::from(&self.dir))
    }
}
