//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. Typing the
//! common shapes keeps readers of the trail honest.

use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}
