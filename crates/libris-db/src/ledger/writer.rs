//! JSONL ledger writer.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use libris_core::ledger::LedgerRecord;
use serde_jsonlines::append_json_lines;

use crate::error::StoreError;

/// Appends ledger records to one JSONL file per UTC day.
///
/// The day is taken from the record's own timestamp so that replaying a
/// member's history touches only the files for the days involved.
#[derive(Debug, Clone)]
pub struct LedgerWriter {
    ledger_dir: PathBuf,
    enabled: bool,
}

impl LedgerWriter {
    /// Create a writer rooted at `ledger_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(ledger_dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&ledger_dir)
            .map_err(|e| StoreError::Query(format!("create ledger dir: {e}")))?;
        Ok(Self {
            ledger_dir,
            enabled: true,
        })
    }

    /// A writer that drops every record. Used when no ledger directory is
    /// configured and by tests that do not care about the journal.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            ledger_dir: PathBuf::new(),
            enabled: false,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn ledger_dir(&self) -> &Path {
        &self.ledger_dir
    }

    /// Append one record to the file for its day.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn append(&self, record: &LedgerRecord) -> Result<(), StoreError> {
        if !self.enabled {
            return Ok(());
        }
        let path = self.ledger_dir.join(format!("{}.jsonl", day_of(record)));
        append_json_lines(&path, [record])
            .map_err(|e| StoreError::Query(format!("append ledger record: {e}")))?;
        Ok(())
    }
}

/// The `YYYY-MM-DD` partition for a record, falling back to today when the
/// record's timestamp is malformed.
fn day_of(record: &LedgerRecord) -> String {
    record
        .ts
        .get(..10)
        .filter(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").is_ok())
        .map_or_else(
            || {
                tracing::warn!(
                    "Ledger record {} has malformed timestamp '{}', filing under today",
                    record.id,
                    record.ts
                );
                Utc::now().format("%Y-%m-%d").to_string()
            },
            ToString::to_string,
        )
}

#[cfg(test)]
mod tests {
    use libris_core::enums::{LedgerOp, RequestKind};
    use serde_jsonlines::json_lines;

    use super::*;

    fn record(ts: &str) -> LedgerRecord {
        LedgerRecord {
            v: 1,
            ts: ts.to_string(),
            op: LedgerOp::Create,
            kind: RequestKind::Borrow,
            id: "brw-00000001".to_string(),
            data: serde_json::json!({"status": "pending"}),
        }
    }

    #[test]
    fn partitions_by_record_day() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LedgerWriter::new(dir.path().to_path_buf()).unwrap();

        writer.append(&record("2026-03-14T08:00:00Z")).unwrap();
        writer.append(&record("2026-03-14T17:30:00Z")).unwrap();
        writer.append(&record("2026-03-15T09:00:00Z")).unwrap();

        let day_one: Vec<LedgerRecord> = json_lines(dir.path().join("2026-03-14.jsonl"))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let day_two: Vec<LedgerRecord> = json_lines(dir.path().join("2026-03-15.jsonl"))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(day_one.len(), 2);
        assert_eq!(day_two.len(), 1);
        assert_eq!(day_one[0].id, "brw-00000001");
    }

    #[test]
    fn malformed_timestamp_falls_back_to_today() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LedgerWriter::new(dir.path().to_path_buf()).unwrap();

        writer.append(&record("not-a-timestamp")).unwrap();

        let expected = dir
            .path()
            .join(format!("{}.jsonl", Utc::now().format("%Y-%m-%d")));
        assert!(expected.exists());
    }

    #[test]
    fn disabled_writer_writes_nothing() {
        let writer = LedgerWriter::disabled();
        assert!(!writer.is_enabled());
        writer.append(&record("2026-03-14T08:00:00Z")).unwrap();
        assert_eq!(writer.ledger_dir(), Path::new(""));
    }
}
