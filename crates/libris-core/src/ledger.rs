//! JSONL ledger record envelope.
//!
//! Every create and transition is appended to a per-day ledger file under
//! the configured ledger directory. Together with the audit trail this gives
//! each request an explicit write-time event history, independent of the
//! sparse timestamps the display path reads.
//!
//! The `v` field supports schema versioning: old ledger files without a `v`
//! field deserialize with `v == 1` via `#[serde(default)]`.

use serde::{Deserialize, Serialize};

use crate::enums::{LedgerOp, RequestKind};

/// Default ledger version for files written before the field existed.
const fn default_ledger_version() -> u32 {
    1
}

/// A single operation recorded in the JSONL ledger.
///
/// The `data` field carries the full record for `Create` ops and the
/// status-change detail for `Transition` ops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerRecord {
    /// Schema version. Defaults to 1 for old ledgers without this field.
    #[serde(default = "default_ledger_version")]
    pub v: u32,

    /// ISO 8601 timestamp of the operation.
    pub ts: String,

    /// What kind of mutation this represents.
    pub op: LedgerOp,

    /// Which request machine was affected.
    pub kind: RequestKind,

    /// ID of the affected request.
    pub id: String,

    /// Operation payload. Schema depends on `op`.
    pub data: serde_json::Value,
}
