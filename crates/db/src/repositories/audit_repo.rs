//! Repository for the append-only `audit_events` table.
//!
//! There is deliberately no update or delete here; the table also rejects
//! both with a trigger.

use consentry_core::audit::NewAuditEvent;
use consentry_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::audit::AuditEventRow;

/// Column list for `audit_events` SELECT queries.
const COLUMNS: &str = "id, actor_id, action, subject_type, subject_id, detail, created_at";

pub struct AuditEventRepo;

impl AuditEventRepo {
    /// Append one event. Call with `&mut *tx` to tie it to a state change.
    pub async fn append<'e>(
        executor: impl PgExecutor<'e>,
        event: &NewAuditEvent,
    ) -> Result<AuditEventRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_events (actor_id, action, subject_type, subject_id, detail)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditEventRow>(&query)
            .bind(event.actor_id)
            .bind(event.action)
            .bind(event.subject_type)
            .bind(event.subject_id)
            .bind(&event.detail)
            .fetch_one(executor)
            .await
    }

    /// Events for one subject in append order.
    pub async fn list_for_subject<'e>(
        executor: impl PgExecutor<'e>,
        subject_type: &str,
        subject_id: DbId,
    ) -> Result<Vec<AuditEventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_events
             WHERE subject_type = $1 AND subject_id = $2
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, AuditEventRow>(&query)
            .bind(subject_type)
            .bind(subject_id)
            .fetch_all(executor)
            .await
    }
}
