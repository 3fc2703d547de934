//! Status enums, request kinds, stages, and actions for Libris.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! The serialized strings are part of the external contract: stored rows and
//! JSON output must carry them byte for byte.
//!
//! Status enums with state machines provide `allowed_next_states()` — the one
//! authoritative transition table, consumed by the lifecycle engine, the
//! validity checks, and display code alike.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// RequestKind
// ---------------------------------------------------------------------------

/// Which of the two request machines a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Borrow,
    Donation,
}

impl RequestKind {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Borrow => "borrow",
            Self::Donation => "donation",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BorrowStatus
// ---------------------------------------------------------------------------

/// Status of a borrow request through its circulation lifecycle.
///
/// ```text
/// pending → approved → collected → return_requested → completed
///                                → completed
/// pending → rejected
/// approved → rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorrowStatus {
    Pending,
    Approved,
    Collected,
    ReturnRequested,
    Completed,
    Rejected,
}

impl BorrowStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved => &[Self::Collected, Self::Rejected],
            Self::Collected => &[Self::ReturnRequested, Self::Completed],
            Self::ReturnRequested => &[Self::Completed],
            Self::Completed | Self::Rejected => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether the request can never move again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_next_states().is_empty()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Collected => "collected",
            Self::ReturnRequested => "return_requested",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DonationStatus
// ---------------------------------------------------------------------------

/// Status of a donation request.
///
/// ```text
/// pending → approved → completed
///                    → rejected
/// pending → rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Pending,
    Approved,
    Completed,
    Rejected,
}

impl DonationStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved => &[Self::Completed, Self::Rejected],
            Self::Completed | Self::Rejected => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether the request can never move again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.allowed_next_states().is_empty()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActivityStage
// ---------------------------------------------------------------------------

/// A stage shown in the activity timeline.
///
/// Union of both machines' stages. The strings are identical to the status
/// strings so timeline output and stored statuses never diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStage {
    Pending,
    Approved,
    Collected,
    ReturnRequested,
    Completed,
    Rejected,
}

impl ActivityStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Collected => "collected",
            Self::ReturnRequested => "return_requested",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ActivityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    StatusChanged,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::StatusChanged => "status_changed",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LedgerOp
// ---------------------------------------------------------------------------

/// Operation type recorded in JSONL ledger files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOp {
    Create,
    Transition,
}

impl LedgerOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Transition => "transition",
        }
    }
}

impl fmt::Display for LedgerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
