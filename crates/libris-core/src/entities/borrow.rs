use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::BorrowStatus;

/// A member's request to borrow a catalog book.
///
/// Book title and author are denormalized onto the row so history display
/// survives catalog edits. Stage timestamps stay `None` until the request
/// passes through the stage; once set they never change or reset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BorrowRequest {
    pub id: String,
    pub member_id: String,
    pub book_id: String,
    pub book_title: String,
    pub book_author: String,
    pub status: BorrowStatus,
    /// Agreed return deadline, set at handover.
    pub due_date: Option<DateTime<Utc>>,
    /// Why the request was rejected, set on rejection.
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub collected_at: Option<DateTime<Utc>>,
    pub return_requested_at: Option<DateTime<Utc>>,
    /// Time of the last transition. For completed requests this is the
    /// completion time.
    pub updated_at: DateTime<Utc>,
}
