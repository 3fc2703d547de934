//! Borrow request repository — creation, reads, and status transitions.

use chrono::{DateTime, Utc};

use libris_core::audit_detail::StatusChangedDetail;
use libris_core::entities::{AuditEntry, BorrowRequest};
use libris_core::enums::{AuditAction, BorrowStatus, LedgerOp, RequestKind};
use libris_core::ids::{PREFIX_AUDIT, PREFIX_BORROW};
use libris_core::ledger::LedgerRecord;
use libris_core::lifecycle::BorrowAction;

use crate::error::StoreError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::CirculationService;

const SELECT_COLS: &str = "id, member_id, book_id, book_title, book_author, status, due_date, \
     rejection_reason, created_at, reviewed_at, collected_at, return_requested_at, updated_at";

pub(crate) fn row_to_borrow(row: &libsql::Row) -> Result<BorrowRequest, StoreError> {
    Ok(BorrowRequest {
        id: row.get(0)?,
        member_id: row.get(1)?,
        book_id: row.get(2)?,
        book_title: row.get(3)?,
        book_author: row.get(4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        due_date: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        rejection_reason: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        reviewed_at: parse_optional_datetime(get_opt_string(row, 9)?.as_deref())?,
        collected_at: parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
        return_requested_at: parse_optional_datetime(get_opt_string(row, 11)?.as_deref())?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

impl CirculationService {
    pub async fn create_borrow(
        &self,
        member_id: &str,
        book_id: &str,
        book_title: &str,
        book_author: &str,
    ) -> Result<BorrowRequest, StoreError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_BORROW).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO borrow_requests (id, member_id, book_id, book_title, book_author, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                libsql::params![
                    id.as_str(),
                    member_id,
                    book_id,
                    book_title,
                    book_author,
                    BorrowStatus::Pending.as_str(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let request = BorrowRequest::new(&id, member_id, book_id, book_title, book_author, now);

        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            member_id: Some(member_id.to_string()),
            entity_type: RequestKind::Borrow,
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
            kind: RequestKind::Borrow,
            id: id.clone(),
            data: serde_json::to_value(&request).map_err(|e| StoreError::Other(e.into()))?,
        })?;

        Ok(request)
    }

    pub async fn get_borrow(&self, id: &str) -> Result<BorrowRequest, StoreError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM borrow_requests WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(StoreError::NoResult)?;
        row_to_borrow(&row)
    }

    pub async fn list_borrows(
        &self,
        status: Option<BorrowStatus>,
        member_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<BorrowRequest>, StoreError> {
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
            "SELECT {SELECT_COLS} FROM borrow_requests {where_clause}
             ORDER BY created_at DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut requests = Vec::new();
        while let Some(row) = rows.next().await? {
            requests.push(row_to_borrow(&row)?);
        }
        Ok(requests)
    }

    pub async fn approve_borrow(&self, id: &str) -> Result<BorrowRequest, StoreError> {
        self.transition_borrow(id, &BorrowAction::Approve).await
    }

    pub async fn reject_borrow(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<BorrowRequest, StoreError> {
        self.transition_borrow(
            id,
            &BorrowAction::Reject {
                reason: reason.map(String::from),
            },
        )
        .await
    }

    pub async fn handover_borrow(
        &self,
        id: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<BorrowRequest, StoreError> {
        self.transition_borrow(id, &BorrowAction::Handover { due_date })
            .await
    }

    pub async fn request_return(&self, id: &str) -> Result<BorrowRequest, StoreError> {
        self.transition_borrow(id, &BorrowAction::RequestReturn)
            .await
    }

    pub async fn return_borrow(&self, id: &str) -> Result<BorrowRequest, StoreError> {
        self.transition_borrow(id, &BorrowAction::Return).await
    }

    /// Apply a lifecycle action and persist the result.
    ///
    /// The row is updated with a compare-and-set on the loaded status, so a
    /// concurrent writer that got there first surfaces as `Conflict` instead
    /// of being silently overwritten.
    async fn transition_borrow(
        &self,
        id: &str,
        action: &BorrowAction,
    ) -> Result<BorrowRequest, StoreError> {
        let _guard = self.in_flight().claim(id)?;
        let current = self.get_borrow(id).await?;
        let now = Utc::now();
        let updated = current.apply(action, now)?;

        let affected = self
            .db()
            .conn()
            .execute(
                "UPDATE borrow_requests
                 SET status = ?1, due_date = ?2, rejection_reason = ?3, reviewed_at = ?4,
                     collected_at = ?5, return_requested_at = ?6, updated_at = ?7
                 WHERE id = ?8 AND status = ?9",
                libsql::params![
                    updated.status.as_str(),
                    updated.due_date.map(|d| d.to_rfc3339()),
                    updated.rejection_reason.as_deref(),
                    updated.reviewed_at.map(|d| d.to_rfc3339()),
                    updated.collected_at.map(|d| d.to_rfc3339()),
                    updated.return_requested_at.map(|d| d.to_rfc3339()),
                    updated.updated_at.to_rfc3339(),
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
                BorrowAction::Reject { .. } => updated.rejection_reason.clone(),
                _ => None,
            },
        };

        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            member_id: Some(current.member_id.clone()),
            entity_type: RequestKind::Borrow,
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
            kind: RequestKind::Borrow,
            id: id.to_string(),
            data: serde_json::to_value(&detail).map_err(|e| StoreError::Other(e.into()))?,
        })?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use libris_core::errors::LifecycleError;
    use libris_core::lifecycle::DEFAULT_REJECTION_REASON;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{test_service, test_service_with_ledger};

    fn next_week() -> DateTime<Utc> {
        Utc::now() + Days::new(7)
    }

    #[tokio::test]
    async fn create_borrow_roundtrip() {
        let svc = test_service().await;

        let created = svc
            .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
            .await
            .unwrap();
        assert!(created.id.starts_with("brw-"));
        assert_eq!(created.status, BorrowStatus::Pending);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = svc.get_borrow(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn full_flow_persists_every_stamp() {
        let svc = test_service().await;
        let req = svc
            .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
            .await
            .unwrap();

        svc.approve_borrow(&req.id).await.unwrap();
        let due = next_week();
        svc.handover_borrow(&req.id, Some(due)).await.unwrap();
        svc.request_return(&req.id).await.unwrap();
        svc.return_borrow(&req.id).await.unwrap();

        let done = svc.get_borrow(&req.id).await.unwrap();
        assert_eq!(done.status, BorrowStatus::Completed);
        assert!(done.reviewed_at.is_some());
        assert!(done.collected_at.is_some());
        assert!(done.return_requested_at.is_some());
        assert_eq!(
            done.due_date.map(|d| d.to_rfc3339()),
            Some(due.to_rfc3339())
        );
        assert!(done.updated_at > done.created_at);
    }

    #[tokio::test]
    async fn handover_without_due_date_is_refused() {
        let svc = test_service().await;
        let req = svc
            .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
            .await
            .unwrap();
        svc.approve_borrow(&req.id).await.unwrap();

        let err = svc.handover_borrow(&req.id, None).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Lifecycle(LifecycleError::MissingParameter { .. })
        ));

        let unchanged = svc.get_borrow(&req.id).await.unwrap();
        assert_eq!(unchanged.status, BorrowStatus::Approved);
        assert!(unchanged.collected_at.is_none());
    }

    #[tokio::test]
    async fn reject_without_reason_stores_default() {
        let svc = test_service().await;
        let req = svc
            .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
            .await
            .unwrap();

        svc.reject_borrow(&req.id, None).await.unwrap();

        let rejected = svc.get_borrow(&req.id).await.unwrap();
        assert_eq!(rejected.status, BorrowStatus::Rejected);
        assert_eq!(
            rejected.rejection_reason.as_deref(),
            Some(DEFAULT_REJECTION_REASON)
        );
    }

    #[tokio::test]
    async fn invalid_transition_surfaces_lifecycle_error() {
        let svc = test_service().await;
        let req = svc
            .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
            .await
            .unwrap();

        let err = svc.return_borrow(&req.id).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Lifecycle(LifecycleError::InvalidTransition { .. })
        ));

        let unchanged = svc.get_borrow(&req.id).await.unwrap();
        assert_eq!(unchanged.status, BorrowStatus::Pending);
    }

    #[tokio::test]
    async fn rejected_request_refuses_further_actions() {
        let svc = test_service().await;
        let req = svc
            .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
            .await
            .unwrap();
        svc.reject_borrow(&req.id, Some("Out of copies")).await.unwrap();

        let err = svc.approve_borrow(&req.id).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Lifecycle(LifecycleError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn get_missing_borrow_is_no_result() {
        let svc = test_service().await;
        let err = svc.get_borrow("brw-ffffffff").await.unwrap_err();
        assert!(matches!(err, StoreError::NoResult));
    }

    #[tokio::test]
    async fn list_borrows_filters_by_status_and_member() {
        let svc = test_service().await;
        let a = svc
            .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
            .await
            .unwrap();
        svc.create_borrow("mem-1", "12", "Dune", "Frank Herbert")
            .await
            .unwrap();
        svc.create_borrow("mem-2", "7", "The Hobbit", "J.R.R. Tolkien")
            .await
            .unwrap();
        svc.approve_borrow(&a.id).await.unwrap();

        let approved = svc
            .list_borrows(Some(BorrowStatus::Approved), None, 100)
            .await
            .unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, a.id);

        let for_member = svc.list_borrows(None, Some("mem-1"), 100).await.unwrap();
        assert_eq!(for_member.len(), 2);

        let capped = svc.list_borrows(None, None, 2).await.unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test]
    async fn mutations_are_journaled_to_the_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let svc = test_service_with_ledger(dir.path().to_path_buf()).await;
        let req = svc
            .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
            .await
            .unwrap();
        svc.approve_borrow(&req.id).await.unwrap();

        let mut records: Vec<LedgerRecord> = Vec::new();
        for entry in std::fs::read_dir(dir.path()).unwrap() {
            let path = entry.unwrap().path();
            records.extend(
                serde_jsonlines::json_lines(&path)
                    .unwrap()
                    .collect::<Result<Vec<LedgerRecord>, _>>()
                    .unwrap(),
            );
        }
        records.sort_by(|a, b| a.ts.cmp(&b.ts));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].op, LedgerOp::Create);
        assert_eq!(records[0].kind, RequestKind::Borrow);
        assert_eq!(records[0].id, req.id);
        assert_eq!(records[1].op, LedgerOp::Transition);
        assert_eq!(records[1].data["from"], "pending");
        assert_eq!(records[1].data["to"], "approved");
    }

    #[tokio::test]
    async fn transitions_append_status_changed_audit() {
        let svc = test_service().await;
        let req = svc
            .create_borrow("mem-1", "7", "The Hobbit", "J.R.R. Tolkien")
            .await
            .unwrap();
        svc.approve_borrow(&req.id).await.unwrap();
        svc.reject_borrow(&req.id, Some("Damaged copy")).await.unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some(req.id.clone()),
                action: Some(AuditAction::StatusChanged),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);

        // Newest first: the rejection carries its reason in the detail.
        let detail = entries[0].detail.as_ref().unwrap();
        assert_eq!(detail["from"], "approved");
        assert_eq!(detail["to"], "rejected");
        assert_eq!(detail["reason"], "Damaged copy");

        let approval = entries[1].detail.as_ref().unwrap();
        assert_eq!(approval["from"], "pending");
        assert_eq!(approval["to"], "approved");
        assert!(approval["reason"].is_null());
    }
}
