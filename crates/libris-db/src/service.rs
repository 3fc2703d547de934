//! Circulation service: the storage handle the CLI and tests talk to.

use std::path::PathBuf;

use crate::error::StoreError;
use crate::in_flight::InFlightRegistry;
use crate::ledger::LedgerWriter;
use crate::LibrisDb;

/// Bundles the database, the event ledger, and the in-flight registry.
///
/// Every mutation goes through the same protocol:
///
/// 1. claim the record id in the in-flight registry
/// 2. load the current row
/// 3. validate and apply the lifecycle action in memory
/// 4. persist with a compare-and-set on the old status
/// 5. append an audit entry
/// 6. journal the event to the ledger
///
/// The in-flight claim is released when the guard drops, including on the
/// error paths.
pub struct CirculationService {
    db: LibrisDb,
    ledger: LedgerWriter,
    in_flight: InFlightRegistry,
}

impl CirculationService {
    /// Open a local database at `db_path` and attach a ledger when
    /// `ledger_dir` is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated, or the
    /// ledger directory cannot be created.
    pub async fn new_local(db_path: &str, ledger_dir: Option<PathBuf>) -> Result<Self, StoreError> {
        let db = LibrisDb::open_local(db_path).await?;
        let ledger = match ledger_dir {
            Some(dir) => LedgerWriter::new(dir)?,
            None => LedgerWriter::disabled(),
        };
        Ok(Self::from_db(db, ledger))
    }

    /// Build a service from already-opened parts.
    #[must_use]
    pub fn from_db(db: LibrisDb, ledger: LedgerWriter) -> Self {
        Self {
            db,
            ledger,
            in_flight: InFlightRegistry::new(),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &LibrisDb {
        &self.db
    }

    #[must_use]
    pub const fn ledger(&self) -> &LedgerWriter {
        &self.ledger
    }

    #[must_use]
    pub const fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }
}
