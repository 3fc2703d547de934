use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, RequestKind};

/// An append-only audit trail entry recording a mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: String,
    pub member_id: Option<String>,
    pub entity_type: RequestKind,
    pub entity_id: String,
    pub action: AuditAction,
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
