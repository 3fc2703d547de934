//! Audit trail repository.
//!
//! Append-only audit entries recording every mutation. Supports dynamic
//! filtering by entity, action, and member.

use libris_core::entities::AuditEntry;
use libris_core::enums::{AuditAction, RequestKind};

use crate::error::StoreError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::CirculationService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<RequestKind>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub member_id: Option<String>,
    pub limit: Option<u32>,
}

impl CirculationService {
    /// Append an audit entry. Called by every mutation method.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the INSERT fails.
    pub async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO audit_trail (id, member_id, entity_type, entity_id, action, detail, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    entry.id.as_str(),
                    entry.member_id.as_deref(),
                    entry.entity_type.as_str(),
                    entry.entity_id.as_str(),
                    entry.action.as_str(),
                    entry.detail.as_ref().map(std::string::ToString::to_string).as_deref(),
                    entry.created_at.to_rfc3339()
                ],
            )
            .await?;
        Ok(())
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, StoreError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(ref action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(ref mid) = filter.member_id {
            params.push(libsql::Value::Text(mid.clone()));
            conditions.push(format!("member_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, member_id, entity_type, entity_id, action, detail, created_at
             FROM audit_trail {where_clause}
             ORDER BY created_at DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next().await? {
            entries.push(AuditEntry {
                id: row.get::<String>(0)?,
                member_id: get_opt_string(&row, 1)?,
                entity_type: parse_enum(&row.get::<String>(2)?)?,
                entity_id: row.get::<String>(3)?,
                action: parse_enum(&row.get::<String>(4)?)?,
                detail: parse_optional_json(get_opt_string(&row, 5)?.as_deref())?,
                created_at: parse_datetime(&row.get::<String>(6)?)?,
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use libris_core::ids::PREFIX_AUDIT;

    use super::*;
    use crate::test_support::helpers::test_service;

    async fn append_entry(
        svc: &CirculationService,
        entity_id: &str,
        action: AuditAction,
    ) -> AuditEntry {
        let entry = AuditEntry {
            id: svc.db().generate_id(PREFIX_AUDIT).await.unwrap(),
            member_id: Some("mem-1".to_string()),
            entity_type: RequestKind::Borrow,
            entity_id: entity_id.to_string(),
            action,
            detail: None,
            created_at: Utc::now(),
        };
        svc.append_audit(&entry).await.unwrap();
        entry
    }

    #[tokio::test]
    async fn append_and_query_roundtrip() {
        let svc = test_service().await;
        let entry = append_entry(&svc, "brw-00000001", AuditAction::Created).await;

        let entries = svc.query_audit(&AuditFilter::default()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry.id);
        assert_eq!(entries[0].entity_type, RequestKind::Borrow);
        assert_eq!(entries[0].action, AuditAction::Created);
        assert_eq!(entries[0].member_id.as_deref(), Some("mem-1"));
    }

    #[tokio::test]
    async fn filter_by_entity_and_action() {
        let svc = test_service().await;
        append_entry(&svc, "brw-00000001", AuditAction::Created).await;
        append_entry(&svc, "brw-00000001", AuditAction::StatusChanged).await;
        append_entry(&svc, "brw-00000002", AuditAction::Created).await;

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some("brw-00000001".to_string()),
                action: Some(AuditAction::StatusChanged),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_id, "brw-00000001");
    }

    #[tokio::test]
    async fn limit_caps_results() {
        let svc = test_service().await;
        for i in 0..5 {
            append_entry(&svc, &format!("brw-0000000{i}"), AuditAction::Created).await;
        }

        let entries = svc
            .query_audit(&AuditFilter {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
    }
}
