use std::path::PathBuf;

use anyhow::Context;
use libris_config::LibrisConfig;
use libris_db::service::CirculationService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: CirculationService,
    pub config: LibrisConfig,
}

impl AppContext {
    /// Initialize shared resources from the resolved configuration.
    ///
    /// Command-line flags win over the configuration file for the database
    /// path and the ledger directory.
    pub async fn init(config: LibrisConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let db_path = flags
            .db
            .clone()
            .unwrap_or_else(|| config.database.path.clone());
        let ledger_dir = flags
            .ledger_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| config.ledger.dir_path());

        tracing::debug!(db_path, ledger = ledger_dir.is_some(), "opening circulation store");

        let service = CirculationService::new_local(&db_path, ledger_dir)
            .await
            .context("failed to initialize circulation service")?;

        Ok(Self { service, config })
    }
}
