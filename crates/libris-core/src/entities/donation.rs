use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::DonationStatus;

/// A member's offer to donate a book to the library.
///
/// The offered book is described by title and author; `book_id` stays `None`
/// until the copy is accepted into the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DonationRequest {
    pub id: String,
    pub member_id: String,
    pub book_id: Option<String>,
    pub book_title: String,
    pub book_author: String,
    pub status: DonationStatus,
    /// Why the request was rejected, set on rejection.
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}
