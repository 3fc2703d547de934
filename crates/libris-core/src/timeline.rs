//! Activity timeline reconstruction.
//!
//! Request rows carry one timestamp per stage instead of an event log, so a
//! member's history is synthesized on read: each stage a record has
//! demonstrably passed through becomes one event, dated by that stage's
//! timestamp column. Both the stage gates and the emitted strings come from
//! the same enums the lifecycle engine uses.
//!
//! Reconstruction is pure and never fails: a missing optional timestamp means
//! the stage contributes no event, nothing more.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{BorrowRequest, DonationRequest};
use crate::enums::{ActivityStage, BorrowStatus, DonationStatus, RequestKind};

/// One rendered event in a member's activity timeline.
///
/// Derived on demand, never persisted. `id` is stable across reconstructions:
/// `{record_id}-{stage}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityEvent {
    pub id: String,
    pub source_type: RequestKind,
    pub stage: ActivityStage,
    pub timestamp: DateTime<Utc>,
    pub book_title: String,
    pub book_author: String,
    /// Extra display context: the rejection reason on `rejected` events, the
    /// due date on `collected` events.
    pub note: Option<String>,
}

/// Filter criteria for timeline reconstruction.
///
/// `book_id` wins when set; otherwise `title` and `author` each narrow the
/// result when present. Donations without a catalog id never match a
/// `book_id` filter — use title and author for those.
#[derive(Debug, Clone, Default)]
pub struct TimelineFilter {
    pub book_id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl TimelineFilter {
    fn matches(&self, book_id: Option<&str>, title: &str, author: &str) -> bool {
        if let Some(ref want) = self.book_id {
            return book_id == Some(want.as_str());
        }
        if let Some(ref want) = self.title {
            if want != title {
                return false;
            }
        }
        if let Some(ref want) = self.author {
            if want != author {
                return false;
            }
        }
        true
    }
}

/// Reconstruct the ordered activity timeline for a set of records.
///
/// Events are sorted newest first. The sort is stable, so events sharing a
/// timestamp keep their record order.
#[must_use]
pub fn reconstruct(
    borrows: &[BorrowRequest],
    donations: &[DonationRequest],
    filter: &TimelineFilter,
) -> Vec<ActivityEvent> {
    let mut events = Vec::new();
    for req in borrows {
        if filter.matches(Some(&req.book_id), &req.book_title, &req.book_author) {
            push_borrow_events(req, &mut events);
        }
    }
    for req in donations {
        if filter.matches(req.book_id.as_deref(), &req.book_title, &req.book_author) {
            push_donation_events(req, &mut events);
        }
    }
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events
}

fn push_borrow_events(req: &BorrowRequest, out: &mut Vec<ActivityEvent>) {
    let mut push = |stage: ActivityStage, timestamp: DateTime<Utc>, note: Option<String>| {
        out.push(ActivityEvent {
            id: format!("{}-{}", req.id, stage),
            source_type: RequestKind::Borrow,
            stage,
            timestamp,
            book_title: req.book_title.clone(),
            book_author: req.book_author.clone(),
            note,
        });
    };

    // Every record was submitted.
    push(ActivityStage::Pending, req.created_at, None);

    // Approval is only shown once the record has moved past review in the
    // accepting direction; rejected records show the rejected event instead.
    if !matches!(req.status, BorrowStatus::Pending | BorrowStatus::Rejected) {
        if let Some(at) = req.reviewed_at {
            push(ActivityStage::Approved, at, None);
        }
    }

    if matches!(
        req.status,
        BorrowStatus::Collected | BorrowStatus::ReturnRequested | BorrowStatus::Completed
    ) {
        if let Some(at) = req.collected_at {
            let note = req.due_date.map(|d| format!("Due by {}", d.format("%Y-%m-%d")));
            push(ActivityStage::Collected, at, note);
        }
    }

    if matches!(
        req.status,
        BorrowStatus::ReturnRequested | BorrowStatus::Completed
    ) {
        // Rows written before return_requested_at existed only have
        // updated_at, and that stand-in is gone once the record completes:
        // the stage silently drops out of the timeline for those rows.
        let at = req
            .return_requested_at
            .or_else(|| (req.status == BorrowStatus::ReturnRequested).then_some(req.updated_at));
        if let Some(at) = at {
            push(ActivityStage::ReturnRequested, at, None);
        }
    }

    if req.status == BorrowStatus::Completed {
        push(ActivityStage::Completed, req.updated_at, None);
    }

    if req.status == BorrowStatus::Rejected {
        if let Some(at) = req.reviewed_at {
            push(ActivityStage::Rejected, at, req.rejection_reason.clone());
        }
    }
}

fn push_donation_events(req: &DonationRequest, out: &mut Vec<ActivityEvent>) {
    let mut push = |stage: ActivityStage, timestamp: DateTime<Utc>, note: Option<String>| {
        out.push(ActivityEvent {
            id: format!("{}-{}", req.id, stage),
            source_type: RequestKind::Donation,
            stage,
            timestamp,
            book_title: req.book_title.clone(),
            book_author: req.book_author.clone(),
            note,
        });
    };

    push(ActivityStage::Pending, req.created_at, None);

    if !matches!(req.status, DonationStatus::Pending | DonationStatus::Rejected) {
        if let Some(at) = req.reviewed_at {
            push(ActivityStage::Approved, at, None);
        }
    }

    if req.status == DonationStatus::Completed {
        if let Some(at) = req.completed_at {
            push(ActivityStage::Completed, at, None);
        }
    }

    if req.status == DonationStatus::Rejected {
        if let Some(at) = req.reviewed_at {
            push(ActivityStage::Rejected, at, req.rejection_reason.clone());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
