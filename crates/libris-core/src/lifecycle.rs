//! Request lifecycle engine.
//!
//! Staff actions are closed enums; each action names exactly one target
//! status. Whether an action is legal from the current status is decided by
//! the status enum's `allowed_next_states()` table — the same table the
//! display layer consults — so there is no second, drifting copy of the
//! transition rules.
//!
//! `apply` validates everything before touching a single field: on error the
//! input record is untouched and no timestamp has been stamped.

use chrono::{DateTime, Utc};

use crate::entities::{BorrowRequest, DonationRequest};
use crate::enums::{BorrowStatus, DonationStatus, RequestKind};
use crate::errors::LifecycleError;

/// Reason stored when staff reject a request without stating one.
pub const DEFAULT_REJECTION_REASON: &str = "Rejected by library staff without a stated reason";

fn effective_reason(reason: Option<&str>) -> String {
    match reason {
        Some(r) if !r.trim().is_empty() => r.to_string(),
        _ => DEFAULT_REJECTION_REASON.to_string(),
    }
}

// ---------------------------------------------------------------------------
// BorrowAction
// ---------------------------------------------------------------------------

/// A staff action on a borrow request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowAction {
    Approve,
    Reject { reason: Option<String> },
    Handover { due_date: Option<DateTime<Utc>> },
    RequestReturn,
    Return,
}

impl BorrowAction {
    /// The status this action moves a request into.
    #[must_use]
    pub const fn target(&self) -> BorrowStatus {
        match self {
            Self::Approve => BorrowStatus::Approved,
            Self::Reject { .. } => BorrowStatus::Rejected,
            Self::Handover { .. } => BorrowStatus::Collected,
            Self::RequestReturn => BorrowStatus::ReturnRequested,
            Self::Return => BorrowStatus::Completed,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject { .. } => "reject",
            Self::Handover { .. } => "handover",
            Self::RequestReturn => "request_return",
            Self::Return => "return",
        }
    }
}

// ---------------------------------------------------------------------------
// DonationAction
// ---------------------------------------------------------------------------

/// A staff action on a donation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonationAction {
    Approve,
    Reject { reason: Option<String> },
    Complete,
}

impl DonationAction {
    /// The status this action moves a request into.
    #[must_use]
    pub const fn target(&self) -> DonationStatus {
        match self {
            Self::Approve => DonationStatus::Approved,
            Self::Reject { .. } => DonationStatus::Rejected,
            Self::Complete => DonationStatus::Completed,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject { .. } => "reject",
            Self::Complete => "complete",
        }
    }
}

// ---------------------------------------------------------------------------
// BorrowRequest lifecycle
// ---------------------------------------------------------------------------

impl BorrowRequest {
    /// A fresh request as a member submits it.
    #[must_use]
    pub fn new(
        id: &str,
        member_id: &str,
        book_id: &str,
        book_title: &str,
        book_author: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            member_id: member_id.to_string(),
            book_id: book_id.to_string(),
            book_title: book_title.to_string(),
            book_author: book_author.to_string(),
            status: BorrowStatus::Pending,
            due_date: None,
            rejection_reason: None,
            created_at: now,
            reviewed_at: None,
            collected_at: None,
            return_requested_at: None,
            updated_at: now,
        }
    }

    /// Apply a staff action, returning the updated request.
    ///
    /// The edge is checked first: an action whose target status is not in
    /// `allowed_next_states()` fails regardless of its parameters. Handover
    /// additionally requires a due date no earlier than today.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::InvalidTransition`] if the current status does not
    ///   accept the action.
    /// - [`LifecycleError::MissingParameter`] for `Handover` without a due date.
    /// - [`LifecycleError::Validation`] for a due date in the past.
    pub fn apply(
        &self,
        action: &BorrowAction,
        now: DateTime<Utc>,
    ) -> Result<Self, LifecycleError> {
        let target = action.target();
        if !self.status.can_transition_to(target) {
            return Err(LifecycleError::InvalidTransition {
                kind: RequestKind::Borrow.to_string(),
                id: self.id.clone(),
                from: self.status.to_string(),
                action: action.as_str().to_string(),
            });
        }

        if let BorrowAction::Handover { due_date } = action {
            let Some(due) = due_date else {
                return Err(LifecycleError::MissingParameter {
                    action: action.as_str().to_string(),
                    param: "due_date".to_string(),
                });
            };
            // Date granularity: a due date later today is fine.
            if due.date_naive() < now.date_naive() {
                return Err(LifecycleError::Validation(format!(
                    "due date {} is in the past",
                    due.format("%Y-%m-%d")
                )));
            }
        }

        let mut next = Self {
            status: target,
            updated_at: now,
            ..self.clone()
        };

        match action {
            BorrowAction::Approve => next.reviewed_at = Some(now),
            BorrowAction::Reject { reason } => {
                next.reviewed_at = Some(now);
                next.rejection_reason = Some(effective_reason(reason.as_deref()));
            }
            BorrowAction::Handover { due_date } => {
                next.collected_at = Some(now);
                next.due_date = *due_date;
            }
            BorrowAction::RequestReturn => next.return_requested_at = Some(now),
            BorrowAction::Return => {}
        }

        Ok(next)
    }
}

// ---------------------------------------------------------------------------
// DonationRequest lifecycle
// ---------------------------------------------------------------------------

impl DonationRequest {
    /// A fresh request as a member submits it.
    #[must_use]
    pub fn new(
        id: &str,
        member_id: &str,
        book_title: &str,
        book_author: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            member_id: member_id.to_string(),
            book_id: None,
            book_title: book_title.to_string(),
            book_author: book_author.to_string(),
            status: DonationStatus::Pending,
            rejection_reason: None,
            created_at: now,
            reviewed_at: None,
            completed_at: None,
        }
    }

    /// Apply a staff action, returning the updated request.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] if the current status
    /// does not accept the action.
    pub fn apply(
        &self,
        action: &DonationAction,
        now: DateTime<Utc>,
    ) -> Result<Self, LifecycleError> {
        let target = action.target();
        if !self.status.can_transition_to(target) {
            return Err(LifecycleError::InvalidTransition {
                kind: RequestKind::Donation.to_string(),
                id: self.id.clone(),
                from: self.status.to_string(),
                action: action.as_str().to_string(),
            });
        }

        let mut next = Self {
            status: target,
            ..self.clone()
        };

        match action {
            DonationAction::Approve => next.reviewed_at = Some(now),
            DonationAction::Reject { reason } => {
                next.reviewed_at = Some(now);
                next.rejection_reason = Some(effective_reason(reason.as_deref()));
            }
            DonationAction::Complete => next.completed_at = Some(now),
        }

        Ok(next)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
