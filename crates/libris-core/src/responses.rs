//! Read-model types returned as JSON by `lbr` commands.

use serde::{Deserialize, Serialize};

use crate::entities::{BorrowRequest, DonationRequest};

/// A member's full circulation snapshot.
///
/// This is the input the timeline reconstructor works from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberHistory {
    pub borrows: Vec<BorrowRequest>,
    pub donations: Vec<DonationRequest>,
}
