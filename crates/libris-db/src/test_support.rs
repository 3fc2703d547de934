//! Shared test utilities for libris-db tests.

#[cfg(test)]
pub(crate) mod helpers {
    use crate::LibrisDb;
    use crate::ledger::LedgerWriter;
    use crate::service::CirculationService;

    /// Create an in-memory service with the ledger disabled (for pure DB tests).
    pub async fn test_service() -> CirculationService {
        let db = LibrisDb::open_local(":memory:").await.unwrap();
        CirculationService::from_db(db, LedgerWriter::disabled())
    }

    /// Create an in-memory service journaling to a temp ledger directory.
    pub async fn test_service_with_ledger(ledger_dir: std::path::PathBuf) -> CirculationService {
        let db = LibrisDb::open_local(":memory:").await.unwrap();
        let ledger = LedgerWriter::new(ledger_dir).unwrap();
        CirculationService::from_db(db, ledger)
    }
}
