//! Donation request repository — creation, reads, and status transitions.

use chrono::Utc;

use libris_core::audit_detail::StatusChangedDetail;
use libris_core::entities::{AuditEntry, DonationRequest};
use libris_core::enums::{AuditAction, DonationStatus, LedgerOp, RequestKind};
use libris_core::ids::{PREFIX_AUDIT, PREFIX_DONATION};
use libris_core::ledger::LedgerRecord;
use libris_core::lifecycle::DonationAction;

use crate::error::StoreError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::CirculationService;

const SELECT_COLS: &str = "id, member_id, book_id, book_title, book_author, status, \
     rejection_reason, created_at, reviewed_at, completed_at";

pub(crate) fn row_to_donation(row: &libsql::Row) -> Result<DonationRequest, StoreError> {
    Ok(DonationRequest {
        id: row.get(0)?,
        member_id: row.get(1)?,
        book_id: get_opt_string(row, 2)?,
        book_title: row.get(3)?,
        book_author: row.get(4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        rejection_reason: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        reviewed_at: parse_optional_datetime(get_opt_string(row, 8)?.as_deref())?,
        completed_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
    })
}

impl CirculationService {
    pub async fn create_donation(
        &self,
        member_id: &str,
        book_title: &str,
        book_author: &str,
    ) -> Result<DonationRequest, StoreError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_DONATION).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO donation_requests (id, member_id, book_title, book_author, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    member_id,
                    book_title,
                    book_author,
                    DonationStatus::Pending.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let request = DonationRequest::new(&id, member_id, book_title, book_author, now);

        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            member_id: Some(member_id.to_string()),
            entity_type: RequestKind::Donation,
            entity_id: id.clone(),
            action: AuditAction::Created,
            detail: None,
            created_at: now,
        })
        .await?;

        self.ledger().append(&LedgerRecord {
            v: 1,
            ts: now.to_rfc3339(),
            op: LedgerOp::Create,
            kind: RequestKind::Donation,
            id: id.clone(),
            data: serde_json::to_value(&request).map_err(|e| StoreError::Other(e.into()))?,
        })?;

        Ok(request)
    }

    pub async fn get_donation(&self, id: &str) -> Result<DonationRequest, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM donation_requests WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        row_to_donation(&row)
    }

    pub async fn list_donations(
        &self,
        status: Option<DonationStatus>,
        member_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<DonationRequest>, StoreError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(member_id) = member_id {
            params.push(libsql::Value::Text(member_id.to_string()));
            conditions.push(format!("member_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {SELECT_COLS} FROM donation_requests {where_clause}
             ORDER BY created_at DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut requests = Vec::new();
        while let Some(row) = rows.next().await? {
            requests.push(row_to_donation(&row)?);
        }
        Ok(requests)
    }

    pub async fn approve_donation(&self, id: &str) -> Result<DonationRequest, StoreError> {
        self.transition_donation(id, &DonationAction::Approve).await
    }

    pub async fn reject_donation(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<DonationRequest, StoreError> {
        self.transition_donation(
            id,
            &DonationAction::Reject {
                reason: reason.map(String::from),
            },
        )
        .await
    }

    pub async fn complete_donation(&self, id: &str) -> Result<DonationRequest, StoreError> {
        self.transition_donation(id, &DonationAction::Complete)
            .await
    }

    /// Apply a lifecycle action and persist the result, with the same
    /// compare-and-set protocol as borrow transitions.
    async fn transition_donation(
        &self,
        id: &str,
        action: &DonationAction,
    ) -> Result<DonationRequest, StoreError> {
        let _guard = self.in_flight().claim(id)?;
        let current = self.get_donation(id).await?;
        let now = Utc::now();
        let updated = current.apply(action, now)?;

        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE donation_requests
                 SET status = ?1, rejection_reason = ?2, reviewed_at = ?3, completed_at = ?4
                 WHERE id = ?5 AND status = ?6",
                libsql::params![
                    updated.status.as_str(),
                    updated.rejection_reason.as_deref(),
                    updated.reviewed_at.map(|d| d.to_rfc3339()),
                    updated.completed_at.map(|d| d.to_rfc3339()),
                    id,
                    current.status.as_str()
                ],
            )
            .await?;
        if affected == 0 {
            return Err(StoreError::Conflict(id.to_string()));
        }

        let detail = StatusChangedDetail {
            from: current.status.as_str().to_string(),
            to: updated.status.as_str().to_string(),
            reason: match action {
                DonationAction::Reject { .. } => updated.rejection_reason.clone(),
                _ => None,
            },
        };

        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            member_id: Some(current.member_id.clone()),
            entity_type: RequestKind::Donation,
            entity_id: id.to_string(),
            action: AuditAction::StatusChanged,
            detail: Some(serde_json::to_value(&detail).map_err(|e| StoreError::Other(e.into()))?),
            created_at: now,
        })
        .await?;

        self.ledger().append(&LedgerRecord {
            v: 1,
            ts: now.to_rfc3339(),
            op: LedgerOp::Transition,
            kind: RequestKind::Donation,
            id: id.to_string(),
            data: serde_json::to_value(&detail).map_err(|e| StoreError::Other(e.into()))?,
        })?;

        Ok(updated)
    }
}
