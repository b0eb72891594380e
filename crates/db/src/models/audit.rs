//! `audit_events` table row. Immutable once inserted (no `updated_at`).

use consentry_core::audit::AuditEvent;
use consentry_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct AuditEventRow {
    pub id: DbId,
    pub actor_id: Option<DbId>,
    pub action: String,
    pub subject_type: String,
    pub subject_id: Option<DbId>,
    pub detail: serde_json::Value,
    pub created_at: Timestamp,
}

impl From<AuditEventRow> for AuditEvent {
    fn from(row: AuditEventRow) -> Self {
        AuditEvent {
            id: row.id,
            actor_id: row.actor_id,
            action: row.action,
            subject_type: row.subject_type,
            subject_id: row.subject_id,
            detail: row.detail,
            created_at: row.created_at,
        }
    }
}
