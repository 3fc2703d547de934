//! Member history — both request kinds for one member, plus the
//! reconstructed activity timeline.

use libris_core::entities::{BorrowRequest, DonationRequest};
use libris_core::responses::MemberHistory;
use libris_core::timeline::{self, ActivityEvent, TimelineFilter};

use crate::error::StoreError;
use crate::repos::borrow::row_to_borrow;
use crate::repos::donation::row_to_donation;
use crate::service::CirculationService;

impl CirculationService {
    /// Every request the member has ever filed, newest first per kind.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a query fails.
    pub async fn member_history(&self, member_id: &str) -> Result<MemberHistory, StoreError> {
        Ok(MemberHistory {
            borrows: self.member_borrows(member_id).await?,
            donations: self.member_donations(member_id).await?,
        })
    }

    /// The member's activity timeline: per-stage events synthesized from the
    /// request rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a query fails.
    pub async fn member_timeline(
        &self,
        member_id: &str,
        filter: &TimelineFilter,
    ) -> Result<Vec<ActivityEvent>, StoreError> {
        let borrows = self.member_borrows(member_id).await?;
        let donations = self.member_donations(member_id).await?;
        Ok(timeline::reconstruct(&borrows, &donations, filter))
    }

    async fn member_borrows(&self, member_id: &str) -> Result<Vec<BorrowRequest>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, member_id, book_id, book_title, book_author, status, due_date,
                        rejection_reason, created_at, reviewed_at, collected_at,
                        return_requested_at, updated_at
                 FROM borrow_requests WHERE member_id = ?1 ORDER BY created_at DESC",
                [member_id],
            )
            .await?;
        let mut requests = Vec::new();
        while let Some(row) = rows.next().await? {
            requests.push(row_to_borrow(&row)?);
        }
        Ok(requests)
    }

    async fn member_donations(&self, member_id: &str) -> Result<Vec<DonationRequest>, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, member_id, book_id, book_title, book_author, status,
                        rejection_reason, created_at, reviewed_at, completed_at
                 FROM donation_requests WHERE member_id = ?1 ORDER BY created_at DESC",
                [member_id],
            )
            .await?;
        let mut requests = Vec::new();
        while let Some(row) = rows.next().await? {
            requests.push(row_to_donation(&row)?);
        }
        Ok(requests)
    }
}
